//! `mt-core` — foundational types for the `mobtrace` trajectory synthesizer.
//!
//! This crate is a dependency of every other `mt-*` crate.  It has no `mt-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `EntityId`                           |
//! | [`geom`]   | `PlanarPoint`, `BBox`                                    |
//! | [`rng`]    | `EntityRng` (per-entity, seed-mixed)                     |
//! | [`config`] | `TraceConfig`, near-radius and attempt-cap defaults      |
//! | [`error`]  | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::TraceConfig;
pub use error::{CoreError, CoreResult};
pub use geom::{BBox, PlanarPoint};
pub use ids::{EdgeId, EntityId, NodeId};
pub use rng::EntityRng;
