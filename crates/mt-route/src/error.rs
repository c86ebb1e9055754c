use mt_spatial::SpatialError;
use thiserror::Error;

/// Fatal outcomes of endpoint sampling and route stitching.
///
/// "No path between these two nodes" is not here: the stitcher absorbs it by
/// retrying or backtracking.  What escapes means the graph or the
/// configuration cannot produce a route at all.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RouteError {
    #[error(
        "could not sample {what} within {attempts} attempts \
         (graph too small or constraints too tight)"
    )]
    DegenerateEndpointSample { what: &'static str, attempts: u32 },

    #[error("route exhausted after backtracking {backtracks} nodes from a dead end")]
    RouteTooShortToBacktrack { backtracks: u32 },

    #[error("no usable path after {attempts} failed path queries")]
    RetriesExhausted { attempts: u32 },

    #[error("graph error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type RouteResult<T> = Result<T, RouteError>;
