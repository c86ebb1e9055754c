//! Per-entity summary rows written next to the trajectory table.

use mt_route::StitchedRoute;
use mt_trajectory::Trajectory;

/// How one entity's route was put together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySummaryRow {
    pub entity_id:   u32,
    pub route_nodes: u32,
    pub segments:    u32,
    pub backtracks:  u32,
    pub travel_secs: f64,
    /// Straight-line distance covered between consecutive samples.
    pub sampled_m:   f64,
}

impl EntitySummaryRow {
    pub fn new(route: &StitchedRoute, trajectory: &Trajectory) -> Self {
        Self {
            entity_id:   trajectory.entity.0,
            route_nodes: route.route.nodes.len() as u32,
            segments:    route.segments,
            backtracks:  route.backtracks,
            travel_secs: route.route.total_travel_secs,
            sampled_m:   trajectory.sampled_distance_m(),
        }
    }
}
