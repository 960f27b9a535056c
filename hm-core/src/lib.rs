//! Core graph model and shared support code for HuskyMaps routing.
//!
//! The routing preprocessors operate on a [`WeightedGraph`]: a directed multigraph keyed by stable
//! 64-bit node identifiers, where every node carries a geographic [`Location`]. Great-circle
//! distance between node locations serves both as the weight of loaded road edges and as an
//! admissible lower bound for goal-directed searches.

pub mod errors;
pub mod geo;
pub mod graph;
pub mod logging;

#[cfg(feature = "testutils")]
pub mod testutils;

pub use crate::errors::GraphError;
pub use crate::geo::Location;
pub use crate::graph::{
    EdgeLabel,
    Node,
    NodeId,
    WeightedEdge,
    WeightedGraph,
};
