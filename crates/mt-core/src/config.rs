//! Trace-synthesis configuration.
//!
//! Typically deserialized from a TOML file by the application crate (feature
//! `serde`), overridden from the command line, then validated once before
//! the batch runs.

use crate::{CoreError, CoreResult, PlanarPoint};

/// Radius around the target site inside which "near" endpoints are drawn.
pub const DEFAULT_NEAR_RADIUS_M: f64 = 500.0;

/// Cap on rejection-sampling draws for a single endpoint.
pub const DEFAULT_MAX_SAMPLE_ATTEMPTS: u32 = 10_000;

/// Cap on failed shortest-path queries while stitching one entity's route.
pub const DEFAULT_MAX_PATH_ATTEMPTS: u32 = 1_000;

/// Top-level configuration for one trace batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TraceConfig {
    /// Number of independent mobile entities (one trajectory each).
    pub entity_count: u32,

    /// Length of the shared time grid in seconds.  Every trajectory has
    /// `duration_secs + 1` samples.
    pub duration_secs: u32,

    /// Master RNG seed.  The same seed always produces identical traces.
    pub seed: u64,

    /// Straight-line distance a freshly drawn endpoint pair must exceed.
    pub min_travel_dist_m: f64,

    /// Site to bias routes toward and away from.  `None` selects the
    /// unconstrained sampling policy.
    pub target: Option<PlanarPoint>,

    /// "Near target" radius for the target-biased policy.
    pub near_radius_m: f64,

    /// Draw "far" endpoints on the bounding-box boundary.  When `false`,
    /// far endpoints are ordinary distance-constrained destinations.
    pub boundary_sampling: bool,

    /// Rejection-sampling cap per endpoint draw.
    pub max_sample_attempts: u32,

    /// Failed path-query cap per entity.
    pub max_path_attempts: u32,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            entity_count:        10,
            duration_secs:       30 * 60,
            seed:                34,
            min_travel_dist_m:   1_000.0,
            target:              None,
            near_radius_m:       DEFAULT_NEAR_RADIUS_M,
            boundary_sampling:   true,
            max_sample_attempts: DEFAULT_MAX_SAMPLE_ATTEMPTS,
            max_path_attempts:   DEFAULT_MAX_PATH_ATTEMPTS,
            num_threads:         None,
        }
    }
}

impl TraceConfig {
    /// Reject values that would make synthesis meaningless or unbounded.
    pub fn validate(&self) -> CoreResult<()> {
        if self.entity_count == 0 {
            return Err(CoreError::Config("entity_count must be at least 1".into()));
        }
        if self.duration_secs == 0 {
            return Err(CoreError::Config("duration_secs must be at least 1".into()));
        }
        if !self.min_travel_dist_m.is_finite() || self.min_travel_dist_m < 0.0 {
            return Err(CoreError::Config(format!(
                "min_travel_dist_m must be a non-negative finite distance, got {}",
                self.min_travel_dist_m
            )));
        }
        if !self.near_radius_m.is_finite() || self.near_radius_m <= 0.0 {
            return Err(CoreError::Config(format!(
                "near_radius_m must be positive and finite, got {}",
                self.near_radius_m
            )));
        }
        if let Some(t) = self.target {
            if !t.is_finite() {
                return Err(CoreError::Config(format!("target {t} is not finite")));
            }
        }
        if self.max_sample_attempts == 0 || self.max_path_attempts == 0 {
            return Err(CoreError::Config("attempt caps must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }

    /// Number of samples in every trajectory of this batch.
    #[inline]
    pub fn samples_per_entity(&self) -> usize {
        self.duration_secs as usize + 1
    }
}
