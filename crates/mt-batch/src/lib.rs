//! `mt-batch` — synthesize one trajectory per mobile entity.
//!
//! # Per-entity pipeline
//!
//! ```text
//! for entity in 0..config.entity_count:          (parallel with `parallel`)
//!   rng        = EntityRng::new(config.seed, entity)
//!   route      = RouteStitcher::stitch(duration, rng)
//!   trajectory = resample(graph, route, entity, duration)
//! then, sequentially in entity order:
//!   observer.on_entity_done(route, trajectory)
//! ```
//!
//! Entities share only the read-only graph and router.  Each owns its RNG,
//! so output depends on `(seed, entity)` alone and is identical with or
//! without the `parallel` feature.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Traces entities on Rayon's thread pool.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mt_batch::{NoopObserver, TraceBatchBuilder};
//! use mt_spatial::DijkstraRouter;
//!
//! let batch = TraceBatchBuilder::new(config).entity_count(100).build()?;
//! let trajectories = batch.run(&graph, &DijkstraRouter, &mut NoopObserver)?;
//! ```

pub mod batch;
pub mod builder;
pub mod error;
pub mod observer;
pub mod table;

#[cfg(test)]
mod tests;

pub use batch::{EntityTrace, TraceBatch};
pub use builder::TraceBatchBuilder;
pub use error::{BatchError, BatchResult, EntityError};
pub use observer::{BatchObserver, BatchSummary, NoopObserver};
pub use table::{TraceRow, TraceTable};
