//! `mt-spatial` — street graph, edge geometry, and shortest-path routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`network`]  | `StreetGraph` (CSR + R-tree), `StreetGraphBuilder`         |
//! | [`geometry`] | `EdgeGeometry`: polyline with arc-length interpolation    |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`                  |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |
//!
//! The graph is built once, validated, and then shared read-only by every
//! entity in a batch.  Nothing in this crate mutates a built graph.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Route`.                |

pub mod error;
pub mod geometry;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use geometry::EdgeGeometry;
pub use network::{StreetGraph, StreetGraphBuilder};
pub use router::{DijkstraRouter, Route, Router};
