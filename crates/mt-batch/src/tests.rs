//! Integration tests for mt-batch.

use mt_core::{EntityId, PlanarPoint, TraceConfig};
use mt_route::{RouteStitcher, StitchedRoute};
use mt_spatial::{DijkstraRouter, StreetGraph, StreetGraphBuilder};
use mt_trajectory::Trajectory;

use crate::{BatchObserver, BatchSummary, NoopObserver, TraceBatch, TraceBatchBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(entities: u32, duration: u32) -> TraceConfig {
    TraceConfig {
        entity_count:      entities,
        duration_secs:     duration,
        seed:              42,
        min_travel_dist_m: 150.0,
        num_threads:       Some(1),
        ..Default::default()
    }
}

/// 6 × 6 grid, 100 m spacing, 10 s per block, both directions.
fn grid() -> StreetGraph {
    let n = 6;
    let mut b = StreetGraphBuilder::new();
    let ids: Vec<_> = (0..n * n)
        .map(|i| b.add_node(PlanarPoint::new((i % n) as f64 * 100.0, (i / n) as f64 * 100.0)))
        .collect();
    for row in 0..n {
        for col in 0..n {
            let here = ids[row * n + col];
            if col + 1 < n {
                b.add_road(here, ids[row * n + col + 1], 100.0, 10.0, None);
            }
            if row + 1 < n {
                b.add_road(here, ids[(row + 1) * n + col], 100.0, 10.0, None);
            }
        }
    }
    b.build().unwrap()
}

/// A → B one-way plus an isolated C: every route dead-ends.
fn dead_end() -> StreetGraph {
    let mut b = StreetGraphBuilder::new();
    let a = b.add_node(PlanarPoint::new(0.0, 0.0));
    let bb = b.add_node(PlanarPoint::new(100.0, 0.0));
    b.add_node(PlanarPoint::new(0.0, 100.0));
    b.add_directed_edge(a, bb, 100.0, 10.0, None);
    b.build().unwrap()
}

fn run(config: TraceConfig) -> Vec<Trajectory> {
    TraceBatch::new(config)
        .unwrap()
        .run(&grid(), &DijkstraRouter, &mut NoopObserver)
        .unwrap()
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::BatchError;

    #[test]
    fn overrides_are_applied() {
        let batch = TraceBatchBuilder::new(TraceConfig::default())
            .entity_count(7)
            .duration_secs(120)
            .seed(9)
            .min_travel_dist_m(250.0)
            .target(Some(PlanarPoint::new(1.0, 1.0)))
            .boundary_sampling(false)
            .num_threads(Some(2))
            .build()
            .unwrap();
        let c = batch.config();
        assert_eq!((c.entity_count, c.duration_secs, c.seed), (7, 120, 9));
        assert_eq!(c.min_travel_dist_m, 250.0);
        assert_eq!(c.target, Some(PlanarPoint::new(1.0, 1.0)));
        assert!(!c.boundary_sampling);
        assert_eq!(c.num_threads, Some(2));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = TraceBatchBuilder::default().entity_count(0).build().unwrap_err();
        assert!(matches!(err, BatchError::Config(_)));

        let err = TraceBatch::new(TraceConfig { duration_secs: 0, ..Default::default() }).unwrap_err();
        assert!(matches!(err, BatchError::Config(_)));
    }

    #[test]
    fn empty_graph_fails_setup() {
        let empty = StreetGraphBuilder::new().build().unwrap();
        let batch = TraceBatch::new(test_config(2, 60)).unwrap();
        let err = batch.run(&empty, &DijkstraRouter, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, BatchError::Setup(_)));
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn one_trajectory_per_entity_in_order() {
        let out = run(test_config(5, 300));
        assert_eq!(out.len(), 5);
        for (i, t) in out.iter().enumerate() {
            assert_eq!(t.entity, EntityId(i as u32));
            assert_eq!(t.len(), 301);
            assert_eq!(t.duration_secs(), Some(300));
        }
    }

    #[test]
    fn same_seed_same_output() {
        assert_eq!(run(test_config(4, 200)), run(test_config(4, 200)));
    }

    #[test]
    fn different_seed_different_output() {
        let other = TraceConfig { seed: 43, ..test_config(4, 200) };
        assert_ne!(run(test_config(4, 200)), run(other));
    }

    #[test]
    fn entity_output_ignores_batch_size() {
        let small = run(test_config(3, 200));
        let large = run(test_config(8, 200));
        assert_eq!(small[..], large[..3]);
    }

    #[test]
    fn trace_entity_matches_run() {
        let g = grid();
        let batch = TraceBatch::new(test_config(3, 150)).unwrap();
        let stitcher = RouteStitcher::from_config(&g, &DijkstraRouter, batch.config()).unwrap();
        let single = batch.trace_entity(&g, &stitcher, EntityId(2)).unwrap();
        let all = batch.run(&g, &DijkstraRouter, &mut NoopObserver).unwrap();
        assert_eq!(single.trajectory, all[2]);
        assert!(single.route.route.total_travel_secs >= 150.0);
    }

    #[test]
    fn target_biased_batch_runs() {
        let config = TraceConfig {
            target: Some(PlanarPoint::new(250.0, 250.0)),
            near_radius_m: 150.0,
            min_travel_dist_m: 100.0,
            ..test_config(4, 400)
        };
        let out = run(config);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|t| t.len() == 401));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use crate::{BatchError, EntityError};
    use mt_route::RouteError;

    #[derive(Default)]
    struct Recorder {
        starts:   usize,
        entities: Vec<EntityId>,
        summary:  Option<BatchSummary>,
    }

    impl BatchObserver for Recorder {
        fn on_batch_start(&mut self, _config: &TraceConfig) {
            self.starts += 1;
        }
        fn on_entity_done(&mut self, route: &StitchedRoute, trajectory: &Trajectory) {
            assert!(route.route.nodes.len() >= 2);
            self.entities.push(trajectory.entity);
        }
        fn on_batch_end(&mut self, summary: &BatchSummary) {
            self.summary = Some(*summary);
        }
    }

    #[test]
    fn callbacks_follow_entity_order() {
        let mut rec = Recorder::default();
        TraceBatch::new(test_config(4, 100))
            .unwrap()
            .run(&grid(), &DijkstraRouter, &mut rec)
            .unwrap();

        assert_eq!(rec.starts, 1);
        assert_eq!(rec.entities, (0..4).map(EntityId).collect::<Vec<_>>());
        let summary = rec.summary.unwrap();
        assert_eq!(summary.entities, 4);
        assert_eq!(summary.samples, 4 * 101);
        assert!(summary.segments >= 4);
        assert!(summary.route_secs >= 400.0);
    }

    #[test]
    fn failing_entity_is_reported_by_id() {
        let config = TraceConfig { min_travel_dist_m: 10.0, ..test_config(3, 100) };
        let mut rec = Recorder::default();
        let err = TraceBatch::new(config)
            .unwrap()
            .run(&dead_end(), &DijkstraRouter, &mut rec)
            .unwrap_err();

        match err {
            BatchError::Entity { entity, source } => {
                assert_eq!(entity, EntityId(0));
                assert!(matches!(
                    source,
                    EntityError::Route(RouteError::RouteTooShortToBacktrack { .. })
                ));
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(rec.entities.is_empty());
        assert!(rec.summary.is_none());
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod table_tests {
    use super::*;
    use crate::{TraceRow, TraceTable};

    #[test]
    fn table_concatenates_in_entity_order() {
        let out = run(test_config(3, 50));
        let table = TraceTable::from_trajectories(&out);
        assert_eq!(table.len(), 3 * 51);

        let ids: Vec<u32> = table.rows().iter().map(|r| r.entity_id).collect();
        assert!(ids.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(table.entity_rows(EntityId(1)).count(), 51);

        let first = table.rows()[0];
        let p = out[0].points[0];
        assert_eq!(first, TraceRow { entity_id: 0, time_s: 0, x: p.position.x, y: p.position.y });
    }

    #[test]
    fn run_table_matches_run() {
        let batch = TraceBatch::new(test_config(2, 30)).unwrap();
        let table = batch.run_table(&grid(), &DijkstraRouter, &mut NoopObserver).unwrap();
        let rows: Vec<TraceRow> = run(test_config(2, 30)).iter().flat_map(TraceRow::rows_of).collect();
        assert_eq!(table.rows(), rows.as_slice());
        assert!(TraceTable::default().is_empty());
    }
}

// ── Square scenario ───────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use mt_core::EntityRng;
    use mt_route::{EndpointSampler, SamplingPolicy};
    use mt_trajectory::resample;

    /// A(0,0) B(100,0) C(100,100) D(0,100), bidirectional, 10 s per side.
    fn square() -> (StreetGraph, mt_core::NodeId) {
        let mut b = StreetGraphBuilder::new();
        let a = b.add_node(PlanarPoint::new(0.0, 0.0));
        let bb = b.add_node(PlanarPoint::new(100.0, 0.0));
        let c = b.add_node(PlanarPoint::new(100.0, 100.0));
        let d = b.add_node(PlanarPoint::new(0.0, 100.0));
        b.add_road(a, bb, 100.0, 10.0, None);
        b.add_road(bb, c, 100.0, 10.0, None);
        b.add_road(c, d, 100.0, 10.0, None);
        b.add_road(d, a, 100.0, 10.0, None);
        (b.build().unwrap(), a)
    }

    #[test]
    fn square_from_a_covers_25_seconds() {
        let (g, a) = square();
        let sampler =
            EndpointSampler::new(&g, SamplingPolicy::Unconstrained { min_travel_dist_m: 50.0 }, 1_000).unwrap();
        let stitcher = RouteStitcher::new(&g, &DijkstraRouter, sampler, 100);

        for seed in 0..10 {
            let mut rng = EntityRng::new(seed, EntityId(0));
            let s = stitcher.stitch_from(a, 25, &mut rng).unwrap();
            assert_eq!(s.route.nodes[0], a);
            assert!(s.route.total_travel_secs >= 25.0);

            let t = resample(&g, &s.route, EntityId(0), 25).unwrap();
            assert_eq!(t.len(), 26);
            assert_eq!(t.points[0].position, PlanarPoint::new(0.0, 0.0));
            assert!(t.points.iter().enumerate().all(|(i, p)| p.time == i as u32));

            // Past the route's travel time the entity waits on the terminal node.
            let total = s.route.total_travel_secs;
            let long = resample(&g, &s.route, EntityId(0), total.ceil() as u32 + 5).unwrap();
            let terminal = g.node_pos[s.route.nodes[s.route.nodes.len() - 1].index()];
            let tail: Vec<_> = long.points.iter().filter(|p| p.time as f64 >= total).collect();
            assert!(tail.len() >= 6, "seed {seed}: {} tail samples", tail.len());
            assert!(tail.iter().all(|p| p.position == terminal));
        }
    }
}
