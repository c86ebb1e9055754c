use mt_core::{CoreError, EntityId};
use mt_route::RouteError;
use mt_trajectory::TrajectoryError;
use thiserror::Error;

/// Why a single entity could not be traced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntityError {
    #[error("route synthesis failed: {0}")]
    Route(#[from] RouteError),

    #[error("resampling failed: {0}")]
    Trajectory(#[from] TrajectoryError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] CoreError),

    /// The graph cannot support sampling at all (e.g. it has no nodes).
    #[error("cannot prepare route synthesis: {0}")]
    Setup(RouteError),

    #[error("entity {entity} failed: {source}")]
    Entity {
        entity: EntityId,
        #[source]
        source: EntityError,
    },

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

pub type BatchResult<T> = Result<T, BatchError>;
