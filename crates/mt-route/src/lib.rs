//! `mt-route` — random endpoint sampling and route stitching.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`sampler`]  | `EndpointSampler`, `SamplingPolicy`, `Heading`                 |
//! | [`stitcher`] | `RouteStitcher`, `StitchState`, `StitchedRoute`                |
//! | [`error`]    | `RouteError`, `RouteResult<T>`                                 |
//!
//! # Stitching model
//!
//! One entity's route is a concatenation of shortest paths.  The stitcher
//! draws an initial endpoint pair, routes between them, then keeps drawing a
//! new destination from the current tail and appending the shortest path to
//! it until the cumulative travel time reaches the requested duration.
//!
//! With a target site configured, destinations alternate between "near the
//! target" and "far from it", so routes pass the site repeatedly instead of
//! converging on it once.
//!
//! Dead ends (tail nodes from which the drawn destination is unreachable)
//! are handled by backtracking one node at a time.  Every retry loop is
//! capped; running out of attempts is reported as an error, never a hang.

pub mod error;
pub mod sampler;
pub mod stitcher;


pub use error::{RouteError, RouteResult};
pub use sampler::{EndpointSampler, Heading, SamplingPolicy};
pub use stitcher::{RouteStitcher, StitchState, StitchedRoute};
