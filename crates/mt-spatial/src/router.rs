//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The route stitcher calls routing through the [`Router`] trait, so
//! applications can swap in a contraction hierarchy or A* without touching
//! the stitching logic.  [`DijkstraRouter`] is the default.
//!
//! # Cost
//!
//! Cost is the effective edge travel time in seconds (`f64`).  Travel times
//! are validated positive at build time, so plain Dijkstra applies.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use mt_core::NodeId;

use crate::network::StreetGraph;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered node sequence and its total travel time.
///
/// Consecutive nodes are always joined by at least one edge.  A route
/// returned by [`Router::route`] is a single shortest path; the stitcher
/// concatenates several of them into one entity route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub nodes: Vec<NodeId>,
    /// Sum of effective edge travel times along `nodes`, in seconds.
    pub total_travel_secs: f64,
}

impl Route {
    /// Build a route from a node sequence, checking every hop exists and
    /// summing effective travel times.
    pub fn from_nodes(graph: &StreetGraph, nodes: Vec<NodeId>) -> SpatialResult<Route> {
        let mut total = 0.0;
        for hop in nodes.windows(2) {
            total += graph.travel_secs(graph.edge_between(hop[0], hop[1])?);
        }
        if let [only] = nodes.as_slice() {
            graph.check_node(*only)?;
        }
        Ok(Route { nodes, total_travel_secs: total })
    }

    /// `true` if the route has no edges (source equals destination).
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() < 2
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-pair shortest-path engine.
///
/// Implementations must be deterministic for a fixed graph and endpoint pair,
/// and `Send + Sync` so one router can serve every worker of a parallel batch.
pub trait Router: Send + Sync {
    /// Minimum-travel-time route from `from` to `to`.
    ///
    /// Returns [`SpatialError::NoRoute`] when `to` is unreachable, which
    /// callers treat as a normal, retryable outcome.  `from == to` yields a
    /// trivial single-node route.
    fn route(&self, graph: &StreetGraph, from: NodeId, to: NodeId) -> SpatialResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Textbook Dijkstra over the CSR street graph with a binary heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &StreetGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        graph.check_node(from)?;
        graph.check_node(to)?;
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Total order over non-negative, finite costs.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &StreetGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
    if from == to {
        return Ok(Route { nodes: vec![from], total_travel_secs: 0.0 });
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = predecessor on the best known path; INVALID if unreached.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap on (cost, node); NodeId breaks cost ties deterministically.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(&prev, from, to, cost));
        }

        // Stale heap entry.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let new_cost = cost + graph.edge_travel_secs[edge.index()];

            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev[next.index()] = node;
                heap.push(Reverse((Cost(new_cost), next)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(prev: &[NodeId], from: NodeId, to: NodeId, total_secs: f64) -> Route {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    Route { nodes, total_travel_secs: total_secs }
}
