//! Unit tests for mt-trajectory.

use mt_core::{EntityId, NodeId, PlanarPoint};
use mt_spatial::{EdgeGeometry, Route, StreetGraph, StreetGraphBuilder};

use crate::{PathPoint, Trajectory, TrajectoryError, resample};

// ── Helpers ───────────────────────────────────────────────────────────────────

const E: EntityId = EntityId(0);

fn p(x: f64, y: f64) -> PlanarPoint {
    PlanarPoint::new(x, y)
}

fn assert_near(got: PlanarPoint, want: PlanarPoint) {
    assert!(got.distance_m(want) < 1e-9, "got {got}, want {want}");
}

/// Square A(0,0) B(100,0) C(100,100) D(0,100), 100 m / 10 s per side.
fn square() -> (StreetGraph, [NodeId; 4]) {
    let mut b = StreetGraphBuilder::new();
    let a = b.add_node(p(0.0, 0.0));
    let bb = b.add_node(p(100.0, 0.0));
    let c = b.add_node(p(100.0, 100.0));
    let d = b.add_node(p(0.0, 100.0));
    b.add_road(a, bb, 100.0, 10.0, None);
    b.add_road(bb, c, 100.0, 10.0, None);
    b.add_road(c, d, 100.0, 10.0, None);
    b.add_road(d, a, 100.0, 10.0, None);
    (b.build().unwrap(), [a, bb, c, d])
}

fn route(g: &StreetGraph, nodes: &[NodeId]) -> Route {
    Route::from_nodes(g, nodes.to_vec()).unwrap()
}

fn assert_grid(t: &Trajectory, duration: u32) {
    assert_eq!(t.len(), duration as usize + 1);
    for (i, pt) in t.points.iter().enumerate() {
        assert_eq!(pt.time as usize, i);
    }
}

// ── Grid shape ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use super::*;

    #[test]
    fn square_route_yields_26_samples() {
        let (g, [a, b, c, d]) = square();
        let t = resample(&g, &route(&g, &[a, b, c, d]), E, 25).unwrap();
        assert_grid(&t, 25);
        assert_eq!(t.position_at(0), Some(p(0.0, 0.0)));
        assert_near(t.position_at(5).unwrap(), p(50.0, 0.0));
        assert_eq!(t.position_at(10), Some(p(100.0, 0.0)));
        assert_near(t.position_at(25).unwrap(), p(50.0, 100.0));
        assert_eq!(t.position_at(26), None);
    }

    #[test]
    fn long_route_is_truncated() {
        let (g, [a, b, c, d]) = square();
        let t = resample(&g, &route(&g, &[a, b, c, d, a]), E, 3).unwrap();
        assert_grid(&t, 3);
        assert_eq!(t.duration_secs(), Some(3));
        assert_near(t.last_position().unwrap(), p(30.0, 0.0));
    }

    #[test]
    fn zero_duration_keeps_the_origin() {
        let (g, [a, b, ..]) = square();
        let t = resample(&g, &route(&g, &[a, b]), E, 0).unwrap();
        assert_eq!(t.points, vec![PathPoint::new(0, p(0.0, 0.0))]);
    }

    #[test]
    fn entity_is_carried_through() {
        let (g, [a, b, ..]) = square();
        let t = resample(&g, &route(&g, &[a, b]), EntityId(42), 5).unwrap();
        assert_eq!(t.entity, EntityId(42));
    }
}

// ── Interpolation ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod interpolation {
    use super::*;

    #[test]
    fn one_second_edge_has_a_single_midpoint_sample() {
        // A half-second lead-in puts the 1 s edge's only grid second at its
        // midpoint.
        let mut b = StreetGraphBuilder::new();
        let a = b.add_node(p(-5.0, 0.0));
        let mid = b.add_node(p(0.0, 0.0));
        let end = b.add_node(p(10.0, 0.0));
        b.add_directed_edge(a, mid, 5.0, 0.5, None);
        b.add_directed_edge(mid, end, 10.0, 1.0, None);
        let g = b.build().unwrap();

        let t = resample(&g, &route(&g, &[a, mid, end]), E, 4).unwrap();
        assert_grid(&t, 4);
        assert_eq!(t.position_at(0), Some(p(-5.0, 0.0)));
        assert_near(t.position_at(1).unwrap(), p(5.0, 0.0));
        // Closing sample, then tail padding.
        for s in 2..=4 {
            assert_eq!(t.position_at(s), Some(p(10.0, 0.0)));
        }
    }

    #[test]
    fn fractional_edge_boundaries_use_ceiling() {
        let mut b = StreetGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        let m = b.add_node(p(25.0, 0.0));
        let z = b.add_node(p(50.0, 0.0));
        b.add_directed_edge(a, m, 25.0, 2.5, None);
        b.add_directed_edge(m, z, 25.0, 2.5, None);
        let g = b.build().unwrap();

        let t = resample(&g, &route(&g, &[a, m, z]), E, 8).unwrap();
        // First edge: t = 0, 1, 2.
        assert_near(t.position_at(2).unwrap(), p(20.0, 0.0));
        // Second edge entered at 2.5 s: t = 3 is 0.2 along it.
        assert_near(t.position_at(3).unwrap(), p(30.0, 0.0));
        assert_near(t.position_at(4).unwrap(), p(40.0, 0.0));
        // Closing sample at 5 s on the terminal node.
        assert_eq!(t.position_at(5), Some(p(50.0, 0.0)));
        assert_eq!(t.position_at(8), Some(p(50.0, 0.0)));
    }

    #[test]
    fn polyline_edges_are_walked_by_arc_length() {
        let mut b = StreetGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        let z = b.add_node(p(10.0, 10.0));
        b.add_polyline_edge(a, z, 20.0, 20.0, vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)]);
        let g = b.build().unwrap();

        let t = resample(&g, &route(&g, &[a, z]), E, 20).unwrap();
        assert_near(t.position_at(5).unwrap(), p(5.0, 0.0));
        assert_near(t.position_at(10).unwrap(), p(10.0, 0.0));
        assert_near(t.position_at(15).unwrap(), p(10.0, 5.0));
        assert_eq!(t.position_at(20), Some(p(10.0, 10.0)));
    }

    #[test]
    fn parallel_edges_use_the_fastest_geometry() {
        let mut b = StreetGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        let z = b.add_node(p(100.0, 0.0));
        // Short but slow straight edge, and a faster detour.
        b.add_directed_edge(a, z, 100.0, 20.0, None);
        let detour = EdgeGeometry::from_points(&[p(0.0, 0.0), p(50.0, 50.0), p(100.0, 0.0)]);
        b.add_directed_edge(a, z, 141.4, 10.0, detour);
        let g = b.build().unwrap();

        let t = resample(&g, &route(&g, &[a, z]), E, 15).unwrap();
        assert_near(t.position_at(5).unwrap(), p(50.0, 50.0));
        assert_eq!(t.position_at(10), Some(p(100.0, 0.0)));
    }
}

// ── Padding and determinism ───────────────────────────────────────────────────

#[cfg(test)]
mod padding {
    use super::*;

    #[test]
    fn tail_padding_holds_the_destination() {
        let (g, [a, b, ..]) = square();
        let t = resample(&g, &route(&g, &[a, b]), E, 25).unwrap();
        assert_grid(&t, 25);
        assert_near(t.position_at(9).unwrap(), p(90.0, 0.0));
        for s in 10..=25 {
            assert_eq!(t.position_at(s), Some(p(100.0, 0.0)), "second {s}");
        }
        assert_eq!(t.last_position(), Some(p(100.0, 0.0)));
        assert_eq!(t.first_position(), Some(p(0.0, 0.0)));
    }

    #[test]
    fn sampled_distance_matches_route_length() {
        let (g, [a, b, c, _]) = square();
        let t = resample(&g, &route(&g, &[a, b, c]), E, 40).unwrap();
        assert!((t.sampled_distance_m() - 200.0).abs() < 1e-6);
    }

    #[test]
    fn resampling_is_deterministic() {
        let (g, [a, b, c, d]) = square();
        let r = route(&g, &[a, b, c, d, a, b]);
        let one = resample(&g, &r, E, 47).unwrap();
        let two = resample(&g, &r, E, 47).unwrap();
        assert_eq!(one, two);
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use mt_spatial::SpatialError;

    use super::*;

    #[test]
    fn single_node_route_is_rejected() {
        let (g, [a, ..]) = square();
        let r = Route { nodes: vec![a], total_travel_secs: 0.0 };
        assert_eq!(resample(&g, &r, E, 10), Err(TrajectoryError::TrivialRoute { nodes: 1 }));
    }

    #[test]
    fn non_adjacent_hop_is_rejected() {
        let (g, [a, _, c, _]) = square();
        let r = Route { nodes: vec![a, c], total_travel_secs: 0.0 };
        assert_eq!(
            resample(&g, &r, E, 10),
            Err(TrajectoryError::Spatial(SpatialError::EdgeNotFound { from: a, to: c }))
        );
    }
}
