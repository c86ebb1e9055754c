//! The `TraceBatch` driver.

use log::{debug, info};

use mt_core::{EntityId, EntityRng, TraceConfig};
use mt_route::{RouteStitcher, StitchedRoute};
use mt_spatial::{Router, StreetGraph};
use mt_trajectory::{Trajectory, resample};

use crate::{BatchError, BatchObserver, BatchResult, BatchSummary, EntityError, TraceTable};

/// One traced entity: the stitched route and its resampled trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTrace {
    pub route:      StitchedRoute,
    pub trajectory: Trajectory,
}

/// A validated batch configuration, ready to run against any graph.
///
/// Create via [`TraceBatch::new`] or [`TraceBatchBuilder`][crate::TraceBatchBuilder].
#[derive(Debug, Clone)]
pub struct TraceBatch {
    config: TraceConfig,
}

impl TraceBatch {
    pub fn new(config: TraceConfig) -> BatchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Trace every entity and return their trajectories in entity order.
    ///
    /// # Errors
    ///
    /// - [`BatchError::Setup`] if the graph cannot be sampled at all.
    /// - [`BatchError::Entity`] for the lowest-numbered entity that failed.
    ///   The observer has then seen only the entities before it, and
    ///   `on_batch_end` is not called.
    pub fn run<R, O>(&self, graph: &StreetGraph, router: &R, observer: &mut O) -> BatchResult<Vec<Trajectory>>
    where
        R: Router,
        O: BatchObserver,
    {
        let stitcher = RouteStitcher::from_config(graph, router, &self.config).map_err(BatchError::Setup)?;

        info!(
            "tracing {} entities over {} s on a graph of {} nodes / {} edges",
            self.config.entity_count,
            self.config.duration_secs,
            graph.node_count(),
            graph.edge_count()
        );
        observer.on_batch_start(&self.config);

        let results = self.trace_all(graph, &stitcher)?;

        let mut summary = BatchSummary::default();
        let mut trajectories = Vec::with_capacity(results.len());
        for result in results {
            let EntityTrace { route, trajectory } = result?;
            summary.record(&route, &trajectory);
            observer.on_entity_done(&route, &trajectory);
            trajectories.push(trajectory);
        }

        info!(
            "traced {} entities: {} samples, {} segments, {} backtracks",
            summary.entities, summary.samples, summary.segments, summary.backtracks
        );
        observer.on_batch_end(&summary);
        Ok(trajectories)
    }

    /// [`run`](Self::run), concatenated into a single table.
    pub fn run_table<R, O>(&self, graph: &StreetGraph, router: &R, observer: &mut O) -> BatchResult<TraceTable>
    where
        R: Router,
        O: BatchObserver,
    {
        Ok(TraceTable::from_trajectories(&self.run(graph, router, observer)?))
    }

    /// Stitch and resample a single entity.
    ///
    /// Depends only on the configuration, the graph, and `entity`; calling it
    /// twice yields identical results.
    pub fn trace_entity<R: Router>(
        &self,
        graph:    &StreetGraph,
        stitcher: &RouteStitcher<'_, R>,
        entity:   EntityId,
    ) -> BatchResult<EntityTrace> {
        let fail = |source: EntityError| BatchError::Entity { entity, source };
        let duration = self.config.duration_secs;

        let mut rng = EntityRng::new(self.config.seed, entity);
        let route = stitcher.stitch(duration, &mut rng).map_err(|e| fail(e.into()))?;
        let trajectory = resample(graph, &route.route, entity, duration).map_err(|e| fail(e.into()))?;

        debug!(
            "{entity}: {} nodes, {:.1} s of travel, {} backtracks",
            route.route.nodes.len(),
            route.route.total_travel_secs,
            route.backtracks
        );
        Ok(EntityTrace { route, trajectory })
    }

    #[cfg(not(feature = "parallel"))]
    fn trace_all<R: Router>(
        &self,
        graph:    &StreetGraph,
        stitcher: &RouteStitcher<'_, R>,
    ) -> BatchResult<Vec<BatchResult<EntityTrace>>> {
        if self.config.num_threads.is_some() {
            debug!("num_threads ignored: built without the `parallel` feature");
        }
        Ok((0..self.config.entity_count)
            .map(|i| self.trace_entity(graph, stitcher, EntityId(i)))
            .collect())
    }

    #[cfg(feature = "parallel")]
    fn trace_all<R: Router>(
        &self,
        graph:    &StreetGraph,
        stitcher: &RouteStitcher<'_, R>,
    ) -> BatchResult<Vec<BatchResult<EntityTrace>>> {
        use rayon::prelude::*;

        let ids: Vec<EntityId> = (0..self.config.entity_count).map(EntityId).collect();
        let trace = || -> Vec<BatchResult<EntityTrace>> {
            ids.par_iter().map(|&e| self.trace_entity(graph, stitcher, e)).collect()
        };

        match self.config.num_threads {
            None => Ok(trace()),
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| BatchError::ThreadPool(e.to_string()))?;
                Ok(pool.install(trace))
            }
        }
    }
}
