//! Batch observer trait for progress reporting and output.

use mt_core::TraceConfig;
use mt_route::StitchedRoute;
use mt_trajectory::Trajectory;

/// Totals over a finished batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatchSummary {
    pub entities:   u32,
    pub samples:    usize,
    pub segments:   u64,
    pub backtracks: u64,
    /// Sum of stitched route travel times, in seconds.
    pub route_secs: f64,
}

impl BatchSummary {
    pub(crate) fn record(&mut self, route: &StitchedRoute, trajectory: &Trajectory) {
        self.entities += 1;
        self.samples += trajectory.len();
        self.segments += u64::from(route.segments);
        self.backtracks += u64::from(route.backtracks);
        self.route_secs += route.route.total_travel_secs;
    }
}

/// Callbacks invoked by [`TraceBatch::run`][crate::TraceBatch::run].
///
/// Calls are made from the calling thread in ascending entity order, even
/// when entities were synthesized in parallel.  All methods default to no-ops.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { every: u32 }
///
/// impl BatchObserver for Progress {
///     fn on_entity_done(&mut self, route: &StitchedRoute, t: &Trajectory) {
///         if t.entity.0 % self.every == 0 {
///             println!("{}: {} nodes", t.entity, route.route.nodes.len());
///         }
///     }
/// }
/// ```
pub trait BatchObserver {
    /// Called once before any entity is reported.
    fn on_batch_start(&mut self, _config: &TraceConfig) {}

    /// Called once per successfully traced entity.
    fn on_entity_done(&mut self, _route: &StitchedRoute, _trajectory: &Trajectory) {}

    /// Called once after the last entity, only if every entity succeeded.
    fn on_batch_end(&mut self, _summary: &BatchSummary) {}
}

/// A [`BatchObserver`] that does nothing.
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}
