//! Random route endpoints.
//!
//! Every draw is rejection sampling over the graph's node set, bounded by
//! `max_attempts`.  Exceeding the bound means the constraints cannot be met
//! on this graph and surfaces as [`RouteError::DegenerateEndpointSample`].

use mt_core::{EntityRng, NodeId, PlanarPoint, TraceConfig};
use mt_spatial::StreetGraph;

use crate::{RouteError, RouteResult};

// ── Policy ────────────────────────────────────────────────────────────────────

/// How endpoints are drawn for one batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplingPolicy {
    /// Any node pair farther apart than `min_travel_dist_m`.
    Unconstrained { min_travel_dist_m: f64 },

    /// Alternate between nodes near `target` and "far" nodes.
    TargetBiased {
        target:            PlanarPoint,
        near_radius_m:     f64,
        min_travel_dist_m: f64,
        /// Far endpoints are boundary points snapped to the graph when set,
        /// ordinary distance-constrained destinations otherwise.
        boundary_sampling: bool,
    },
}

impl SamplingPolicy {
    /// Pick the policy implied by a batch configuration: target-biased iff a
    /// target site is set.
    pub fn from_config(config: &TraceConfig) -> Self {
        match config.target {
            None => SamplingPolicy::Unconstrained {
                min_travel_dist_m: config.min_travel_dist_m,
            },
            Some(target) => SamplingPolicy::TargetBiased {
                target,
                near_radius_m:     config.near_radius_m,
                min_travel_dist_m: config.min_travel_dist_m,
                boundary_sampling: config.boundary_sampling,
            },
        }
    }

    fn min_travel_dist_m(&self) -> f64 {
        match *self {
            SamplingPolicy::Unconstrained { min_travel_dist_m }
            | SamplingPolicy::TargetBiased { min_travel_dist_m, .. } => min_travel_dist_m,
        }
    }
}

/// Which way the next destination should pull relative to the target site.
/// Ignored by the unconstrained policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Toward,
    Away,
}

impl Heading {
    #[inline]
    pub fn flip(self) -> Heading {
        match self {
            Heading::Toward => Heading::Away,
            Heading::Away => Heading::Toward,
        }
    }
}

// ── EndpointSampler ───────────────────────────────────────────────────────────

/// Draws route endpoints from a shared, read-only [`StreetGraph`].
///
/// The sampler holds no RNG; each call takes the calling entity's
/// [`EntityRng`], so one sampler can serve a whole parallel batch.
pub struct EndpointSampler<'g> {
    graph:        &'g StreetGraph,
    policy:       SamplingPolicy,
    max_attempts: u32,
    /// No node lies inside the near-target disc.
    near_disc_empty: bool,
}

impl<'g> EndpointSampler<'g> {
    /// # Errors
    /// `DegenerateEndpointSample` if the graph has no nodes.
    pub fn new(graph: &'g StreetGraph, policy: SamplingPolicy, max_attempts: u32) -> RouteResult<Self> {
        if graph.is_empty() {
            return Err(RouteError::DegenerateEndpointSample { what: "any node", attempts: 0 });
        }
        let near_disc_empty = match policy {
            SamplingPolicy::TargetBiased { target, near_radius_m, .. } => {
                !graph.has_node_within(target, near_radius_m)
            }
            SamplingPolicy::Unconstrained { .. } => false,
        };
        Ok(Self { graph, policy, max_attempts: max_attempts.max(1), near_disc_empty })
    }

    #[inline]
    pub fn graph(&self) -> &'g StreetGraph {
        self.graph
    }

    /// Uniformly random node.
    #[inline]
    pub fn random_node(&self, rng: &mut EntityRng) -> NodeId {
        NodeId::from_index(rng.index(self.graph.node_count()))
    }

    #[inline]
    fn pos(&self, node: NodeId) -> PlanarPoint {
        self.graph.node_pos[node.index()]
    }

    /// Two distinct nodes whose straight-line distance exceeds the minimum
    /// travel distance.
    pub fn unconstrained_pair(&self, rng: &mut EntityRng) -> RouteResult<(NodeId, NodeId)> {
        let min2 = self.min_dist2();
        for _ in 0..self.max_attempts {
            let a = self.random_node(rng);
            let b = self.random_node(rng);
            if a != b && self.pos(a).distance2(self.pos(b)) > min2 {
                return Ok((a, b));
            }
        }
        Err(RouteError::DegenerateEndpointSample {
            what:     "endpoint pair beyond the minimum travel distance",
            attempts: self.max_attempts,
        })
    }

    /// A node farther than the minimum travel distance from `start`.
    pub fn destination_from(&self, start: NodeId, rng: &mut EntityRng) -> RouteResult<NodeId> {
        self.graph.check_node(start)?;
        let min2 = self.min_dist2();
        let origin = self.pos(start);
        for _ in 0..self.max_attempts {
            let b = self.random_node(rng);
            if b != start && origin.distance2(self.pos(b)) > min2 {
                return Ok(b);
            }
        }
        Err(RouteError::DegenerateEndpointSample {
            what:     "destination beyond the minimum travel distance",
            attempts: self.max_attempts,
        })
    }

    /// A node within the near radius of the target site.
    ///
    /// Under the unconstrained policy there is no target; this falls back to
    /// a uniformly random node.
    pub fn near_target(&self, rng: &mut EntityRng) -> RouteResult<NodeId> {
        let SamplingPolicy::TargetBiased { target, near_radius_m, .. } = self.policy else {
            return Ok(self.random_node(rng));
        };

        if self.near_disc_empty {
            return Err(RouteError::DegenerateEndpointSample {
                what:     "node near the target site",
                attempts: 0,
            });
        }

        let r2 = near_radius_m * near_radius_m;
        for _ in 0..self.max_attempts {
            let n = self.random_node(rng);
            if self.pos(n).distance2(target) <= r2 {
                return Ok(n);
            }
        }
        Err(RouteError::DegenerateEndpointSample {
            what:     "node near the target site",
            attempts: self.max_attempts,
        })
    }

    /// A uniformly random point on the boundary of the graph's bounding box:
    /// a fair coin picks the fixed axis, a second coin picks min or max on
    /// it, and the free coordinate is uniform across the box.
    pub fn boundary_point(&self, rng: &mut EntityRng) -> RouteResult<PlanarPoint> {
        let bbox = self.graph.bbox().ok_or(RouteError::DegenerateEndpointSample {
            what:     "bounding box",
            attempts: 0,
        })?;
        let fix_x = rng.gen_bool(0.5);
        let at_max = rng.gen_bool(0.5);
        Ok(if fix_x {
            let x = if at_max { bbox.max.x } else { bbox.min.x };
            PlanarPoint::new(x, rng.uniform(bbox.min.y, bbox.max.y))
        } else {
            let y = if at_max { bbox.max.y } else { bbox.min.y };
            PlanarPoint::new(rng.uniform(bbox.min.x, bbox.max.x), y)
        })
    }

    /// A "far" endpoint for a route currently at `from`.
    ///
    /// With boundary sampling this is a boundary point snapped to its nearest
    /// node; otherwise an ordinary [`destination_from`](Self::destination_from).
    pub fn far_endpoint(&self, from: NodeId, rng: &mut EntityRng) -> RouteResult<NodeId> {
        match self.policy {
            SamplingPolicy::TargetBiased { boundary_sampling: true, .. } => {
                let p = self.boundary_point(rng)?;
                self.graph.snap_to_node(p).ok_or(RouteError::DegenerateEndpointSample {
                    what:     "node near the boundary",
                    attempts: 0,
                })
            }
            _ => self.destination_from(from, rng),
        }
    }

    /// Start and end of an entity's first path.
    ///
    /// Target-biased routes start far from the site and head toward it.
    pub fn initial_pair(&self, rng: &mut EntityRng) -> RouteResult<(NodeId, NodeId)> {
        match self.policy {
            SamplingPolicy::Unconstrained { .. } => self.unconstrained_pair(rng),
            SamplingPolicy::TargetBiased { .. } => {
                let start = self.random_node(rng);
                let start = self.far_endpoint(start, rng)?;
                Ok((start, self.near_target(rng)?))
            }
        }
    }

    /// Next destination for a route whose tail is `tail`.
    pub fn next_endpoint(
        &self,
        tail:    NodeId,
        heading: Heading,
        rng:     &mut EntityRng,
    ) -> RouteResult<NodeId> {
        match (self.policy, heading) {
            (SamplingPolicy::Unconstrained { .. }, _) => self.destination_from(tail, rng),
            (SamplingPolicy::TargetBiased { .. }, Heading::Toward) => self.near_target(rng),
            (SamplingPolicy::TargetBiased { .. }, Heading::Away) => self.far_endpoint(tail, rng),
        }
    }

    #[inline]
    fn min_dist2(&self) -> f64 {
        let d = self.policy.min_travel_dist_m();
        d * d
    }
}
