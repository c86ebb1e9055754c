//! Route → per-second trajectory.

use log::trace;

use mt_core::{EntityId, PlanarPoint};
use mt_spatial::{Route, StreetGraph};

use crate::{PathPoint, Trajectory, TrajectoryError, TrajectoryResult};

/// Render `route` as a dense trajectory covering `[0, duration_secs]`.
///
/// Each hop uses the graph's effective edge for that node pair.  An edge
/// entered at `start` seconds and taking `T` seconds contributes a sample at
/// every whole second `t` in `[ceil(start), start + T)`, placed at arc-length
/// fraction `(t - start) / T` along the edge geometry.  One closing sample one
/// second after the last is placed on the terminal node.  The samples are then
/// padded with the first position before and the last position after, and cut
/// to exactly `duration_secs + 1` points.
///
/// The result depends only on the graph, `route` and `duration_secs`.
///
/// # Errors
///
/// - [`TrajectoryError::TrivialRoute`] for a route with fewer than two nodes.
/// - [`TrajectoryError::MalformedEdge`] for a non-positive or non-finite
///   edge travel time.
/// - [`TrajectoryError::Spatial`] if two consecutive route nodes are not
///   adjacent.
pub fn resample(
    graph:         &StreetGraph,
    route:         &Route,
    entity:        EntityId,
    duration_secs: u32,
) -> TrajectoryResult<Trajectory> {
    let raw = edge_samples(graph, route)?;
    let points = fill_grid(&raw, duration_secs);
    trace!("{entity}: {} raw samples, {} grid points", raw.len(), points.len());
    Ok(Trajectory { entity, points })
}

/// Interpolated samples along the route plus the closing sample.  Times are
/// `u64` because the route may run past any `u32` duration.
fn edge_samples(graph: &StreetGraph, route: &Route) -> TrajectoryResult<Vec<(u64, PlanarPoint)>> {
    let &[.., _, terminal] = route.nodes.as_slice() else {
        return Err(TrajectoryError::TrivialRoute { nodes: route.nodes.len() });
    };

    let mut samples = Vec::with_capacity(route.total_travel_secs.max(0.0) as usize + 2);
    let mut start = 0.0_f64;

    for hop in route.nodes.windows(2) {
        let (from, to) = (hop[0], hop[1]);
        let edge = graph.edge_between(from, to)?;
        let travel = graph.travel_secs(edge);
        if !(travel.is_finite() && travel > 0.0) {
            return Err(TrajectoryError::MalformedEdge { from, to, travel_secs: travel });
        }
        let geometry = graph.geometry(edge);
        let end = start + travel;

        let mut t = start.ceil();
        while t < end {
            samples.push((t as u64, geometry.interpolate((t - start) / travel)));
            t += 1.0;
        }
        start = end;
    }

    // The first hop always yields t = 0, so there is a last sample.
    let last_t = samples.last().map_or(0, |&(t, _)| t);
    samples.push((last_t + 1, graph.node_pos[terminal.index()]));
    Ok(samples)
}

/// Pad and truncate strictly increasing samples to `0..=duration_secs`.
fn fill_grid(samples: &[(u64, PlanarPoint)], duration_secs: u32) -> Vec<PathPoint> {
    let horizon = u64::from(duration_secs);
    let mut points = Vec::with_capacity(duration_secs as usize + 1);
    let (Some(&(first_t, first_pos)), Some(&(_, last_pos))) = (samples.first(), samples.last())
    else {
        return points;
    };

    let mut push = |t: u64, position: PlanarPoint| {
        points.push(PathPoint::new(t as u32, position));
    };

    for t in 0..first_t.min(horizon + 1) {
        push(t, first_pos);
    }
    let mut next = first_t;
    for &(t, position) in samples.iter().take_while(|&&(t, _)| t <= horizon) {
        push(t, position);
        next = t + 1;
    }
    for t in next..=horizon {
        push(t, last_pos);
    }
    points
}
