//! Spatial-subsystem error type.

use thiserror::Error;

use mt_core::NodeId;

/// Errors produced by `mt-spatial`.
///
/// `NoRoute` is an ordinary outcome of a path query between disconnected
/// components; callers match on it and retry.  Everything else means the
/// caller asked about something the graph does not contain, or the input
/// data itself is malformed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("malformed edge {from} -> {to}: {reason}")]
    MalformedEdge {
        from:   NodeId,
        to:     NodeId,
        reason: &'static str,
    },

    #[error("node {0} has a non-finite position")]
    MalformedNode(NodeId),
}

impl SpatialError {
    /// `true` for the recoverable "components are disconnected" outcome.
    #[inline]
    pub fn is_no_route(&self) -> bool {
        matches!(self, SpatialError::NoRoute { .. })
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
