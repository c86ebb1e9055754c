//! Street graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the `EdgeId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All edge arrays are sorted (stably) by source node and indexed by
//! `EdgeId`, so parallel edges keep their insertion order within a row.
//!
//! # Parallel edges
//!
//! A `(u, v)` pair may carry several edges.  Routing, stitching and
//! resampling all go through [`StreetGraph::edge_between`], which picks one
//! **effective edge** per pair: minimum travel time, then minimum length,
//! then lowest `EdgeId`.  Timing and geometry both come from that edge.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over planar node positions answers nearest-node
//! and within-radius queries for endpoint sampling.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use mt_core::{BBox, EdgeId, NodeId, PlanarPoint};

use crate::geometry::EdgeGeometry;
use crate::{SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index.
///
/// Edge arrays are `pub` for direct indexed access on hot paths.  Construct
/// through [`StreetGraphBuilder`], which validates every edge.
pub struct StreetGraph {
    /// Planar position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<PlanarPoint>,

    /// CSR row pointer, length `node_count + 1`.
    pub node_out_start: Vec<u32>,

    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Edge length in metres.
    pub edge_length_m: Vec<f64>,

    /// Edge travel time in seconds, always finite and `> 0`.
    pub edge_travel_secs: Vec<f64>,

    /// Polyline geometry of each edge, oriented `from → to`.
    pub edge_geometry: Vec<EdgeGeometry>,

    bbox: Option<BBox>,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetGraph {
    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Fail with `NodeNotFound` unless `node` exists.
    #[inline]
    pub fn check_node(&self, node: NodeId) -> SpatialResult<()> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(node))
        }
    }

    /// Planar position of `node`.
    pub fn position(&self, node: NodeId) -> SpatialResult<PlanarPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    /// Every node id, in index order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_pos.len()).map(NodeId::from_index)
    }

    /// Bounding box of all node coordinates; `None` for an empty graph.
    #[inline]
    pub fn bbox(&self) -> Option<BBox> {
        self.bbox
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// `EdgeId`s of all outgoing edges from `node` (a contiguous range).
    ///
    /// # Panics
    /// Panics if `node` is out of range; use [`check_node`](Self::check_node)
    /// first for untrusted ids.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// All parallel edges `from → to`, possibly none.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> SpatialResult<Vec<EdgeId>> {
        self.check_node(from)?;
        self.check_node(to)?;
        Ok(self
            .out_edges(from)
            .filter(|e| self.edge_to[e.index()] == to)
            .collect())
    }

    /// The effective edge `from → to` (see module docs for the tie-break).
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> SpatialResult<EdgeId> {
        self.edges_between(from, to)?
            .into_iter()
            .min_by(|&a, &b| {
                self.edge_travel_secs[a.index()]
                    .total_cmp(&self.edge_travel_secs[b.index()])
                    .then(self.edge_length_m[a.index()].total_cmp(&self.edge_length_m[b.index()]))
                    .then(a.cmp(&b))
            })
            .ok_or(SpatialError::EdgeNotFound { from, to })
    }

    #[inline]
    pub fn travel_secs(&self, edge: EdgeId) -> f64 {
        self.edge_travel_secs[edge.index()]
    }

    #[inline]
    pub fn length_m(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    #[inline]
    pub fn geometry(&self, edge: EdgeId) -> &EdgeGeometry {
        &self.edge_geometry[edge.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos`, or `None` if the graph has no nodes.
    pub fn snap_to_node(&self, pos: PlanarPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Every node within `radius_m` of `pos` (inclusive), sorted by id.
    pub fn nodes_within(&self, pos: PlanarPoint, radius_m: f64) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .spatial_idx
            .locate_within_distance([pos.x, pos.y], radius_m * radius_m)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// `true` if at least one node lies within `radius_m` of `pos`.
    pub fn has_node_within(&self, pos: PlanarPoint, radius_m: f64) -> bool {
        self.spatial_idx
            .locate_within_distance([pos.x, pos.y], radius_m * radius_m)
            .next()
            .is_some()
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use mt_core::PlanarPoint;
/// use mt_spatial::StreetGraphBuilder;
///
/// let mut b = StreetGraphBuilder::new();
/// let a = b.add_node(PlanarPoint::new(0.0, 0.0));
/// let c = b.add_node(PlanarPoint::new(120.0, 0.0));
/// b.add_road(a, c, 120.0, 9.0, None);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct StreetGraphBuilder {
    nodes:     Vec<PlanarPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:        NodeId,
    to:          NodeId,
    length_m:    f64,
    travel_secs: f64,
    geometry:    RawGeometry,
}

enum RawGeometry {
    Straight,
    Built(EdgeGeometry),
    /// Unvalidated vertices, checked in `build`.
    Vertices(Vec<PlanarPoint>),
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: PlanarPoint) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge `from → to`.
    ///
    /// `geometry` must run from `from` to `to`; `None` means the straight
    /// segment between the two node positions.
    pub fn add_directed_edge(
        &mut self,
        from:        NodeId,
        to:          NodeId,
        length_m:    f64,
        travel_secs: f64,
        geometry:    Option<EdgeGeometry>,
    ) {
        let geometry = geometry.map_or(RawGeometry::Straight, RawGeometry::Built);
        self.raw_edges.push(RawEdge { from, to, length_m, travel_secs, geometry });
    }

    /// Add a directed edge whose geometry is given as raw vertices, as they
    /// come out of a map import.  Fewer than two vertices, or non-finite
    /// ones, fail the later [`build`](Self::build) with `MalformedEdge`.
    pub fn add_polyline_edge(
        &mut self,
        from:        NodeId,
        to:          NodeId,
        length_m:    f64,
        travel_secs: f64,
        vertices:    Vec<PlanarPoint>,
    ) {
        self.raw_edges.push(RawEdge {
            from,
            to,
            length_m,
            travel_secs,
            geometry: RawGeometry::Vertices(vertices),
        });
    }

    /// Add edges in **both directions**; the return edge gets the reversed
    /// geometry.
    pub fn add_road(
        &mut self,
        a:           NodeId,
        b:           NodeId,
        length_m:    f64,
        travel_secs: f64,
        geometry:    Option<EdgeGeometry>,
    ) {
        let back = geometry.as_ref().map(EdgeGeometry::reversed);
        self.add_directed_edge(a, b, length_m, travel_secs, geometry);
        self.add_directed_edge(b, a, length_m, travel_secs, back);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and produce a [`StreetGraph`].
    ///
    /// # Errors
    ///
    /// - [`SpatialError::MalformedNode`] for a non-finite node position.
    /// - [`SpatialError::NodeNotFound`] for an edge endpoint never added.
    /// - [`SpatialError::MalformedEdge`] for a travel time that is not
    ///   finite and positive, a negative / non-finite length, or raw
    ///   geometry with fewer than two finite vertices.
    pub fn build(self) -> SpatialResult<StreetGraph> {
        let node_count = self.nodes.len();

        if let Some(i) = self.nodes.iter().position(|p| !p.is_finite()) {
            return Err(SpatialError::MalformedNode(NodeId::from_index(i)));
        }

        for e in &self.raw_edges {
            for n in [e.from, e.to] {
                if n.index() >= node_count {
                    return Err(SpatialError::NodeNotFound(n));
                }
            }
            if !(e.travel_secs.is_finite() && e.travel_secs > 0.0) {
                return Err(SpatialError::MalformedEdge {
                    from:   e.from,
                    to:     e.to,
                    reason: "travel time must be finite and positive",
                });
            }
            if !(e.length_m.is_finite() && e.length_m >= 0.0) {
                return Err(SpatialError::MalformedEdge {
                    from:   e.from,
                    to:     e.to,
                    reason: "length must be finite and non-negative",
                });
            }
        }

        // Stable sort keeps parallel edges in insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from);

        let edge_count = raw.len();
        let mut edge_from        = Vec::with_capacity(edge_count);
        let mut edge_to          = Vec::with_capacity(edge_count);
        let mut edge_length_m    = Vec::with_capacity(edge_count);
        let mut edge_travel_secs = Vec::with_capacity(edge_count);
        let mut edge_geometry    = Vec::with_capacity(edge_count);
        let mut node_out_start   = vec![0u32; node_count + 1];

        for e in raw {
            node_out_start[e.from.index() + 1] += 1;
            let geometry = match e.geometry {
                RawGeometry::Straight => {
                    EdgeGeometry::straight(self.nodes[e.from.index()], self.nodes[e.to.index()])
                }
                RawGeometry::Built(g) => g,
                RawGeometry::Vertices(v) => {
                    EdgeGeometry::from_points(&v).ok_or(SpatialError::MalformedEdge {
                        from:   e.from,
                        to:     e.to,
                        reason: "geometry needs at least two finite vertices",
                    })?
                }
            };
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length_m.push(e.length_m);
            edge_travel_secs.push(e.travel_secs);
            edge_geometry.push(geometry);
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry { point: [p.x, p.y], id: NodeId::from_index(i) })
            .collect();

        Ok(StreetGraph {
            bbox: BBox::from_points(self.nodes.iter().copied()),
            spatial_idx: RTree::bulk_load(entries),
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_travel_secs,
            edge_geometry,
        })
    }
}
