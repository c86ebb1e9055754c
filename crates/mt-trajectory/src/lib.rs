//! `mt-trajectory` — turning stitched routes into per-second trajectories.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`trajectory`] | `Trajectory`, `PathPoint`                               |
//! | [`resample`]   | `resample`: route to dense integer-second samples       |
//! | [`error`]      | `TrajectoryError`, `TrajectoryResult<T>`                |
//!
//! # Time model
//!
//! A route is traversed edge by edge, each edge taking its effective travel
//! time.  Within an edge the position moves linearly in arc length along the
//! edge polyline.  The continuous motion is sampled at every whole second in
//! `[0, duration]`; before the first sample and after the route ends the
//! entity holds its position.

pub mod error;
pub mod resample;
pub mod trajectory;

#[cfg(test)]
mod tests;

pub use error::{TrajectoryError, TrajectoryResult};
pub use resample::resample;
pub use trajectory::{PathPoint, Trajectory};
