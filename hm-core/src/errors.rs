use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised by lookups against a [`WeightedGraph`](crate::WeightedGraph).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NotFound(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;
