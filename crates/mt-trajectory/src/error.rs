use mt_core::NodeId;
use mt_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    /// A route needs at least one hop to define any motion.
    #[error("route has {nodes} node(s); at least 2 are required")]
    TrivialRoute { nodes: usize },

    /// The effective edge has a travel time no division can use.
    #[error("edge {from} -> {to} has unusable travel time {travel_secs}")]
    MalformedEdge { from: NodeId, to: NodeId, travel_secs: f64 },

    #[error("graph error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type TrajectoryResult<T> = Result<T, TrajectoryError>;
