//! Fluent builder for a [`TraceBatch`].

use mt_core::{PlanarPoint, TraceConfig};

use crate::{BatchResult, TraceBatch};

/// Fluent builder for [`TraceBatch`].
///
/// Starts from a base [`TraceConfig`] (typically loaded from a file) and
/// applies individual overrides, as a command line would.  Validation
/// happens once, in [`build`](Self::build).
///
/// # Example
///
/// ```rust,ignore
/// let batch = TraceBatchBuilder::new(TraceConfig::default())
///     .entity_count(500)
///     .duration_secs(3_600)
///     .target(Some(PlanarPoint::new(1_200.0, 800.0)))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TraceBatchBuilder {
    config: TraceConfig,
}

impl TraceBatchBuilder {
    pub fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    pub fn entity_count(mut self, n: u32) -> Self {
        self.config.entity_count = n;
        self
    }

    pub fn duration_secs(mut self, secs: u32) -> Self {
        self.config.duration_secs = secs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn min_travel_dist_m(mut self, metres: f64) -> Self {
        self.config.min_travel_dist_m = metres;
        self
    }

    /// `Some` switches to target-biased sampling; `None` to unconstrained.
    pub fn target(mut self, target: Option<PlanarPoint>) -> Self {
        self.config.target = target;
        self
    }

    pub fn boundary_sampling(mut self, on: bool) -> Self {
        self.config.boundary_sampling = on;
        self
    }

    /// Worker threads for the `parallel` feature; ignored otherwise.
    pub fn num_threads(mut self, n: Option<usize>) -> Self {
        self.config.num_threads = n;
        self
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Validate the configuration and return a ready-to-run batch.
    pub fn build(self) -> BatchResult<TraceBatch> {
        TraceBatch::new(self.config)
    }
}
