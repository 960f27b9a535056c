#![deny(
    // Strict on purpose: an inline allow is cheaper than a missed lint, and flags the spot for review.
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]

//! # hm-ch – contraction hierarchy construction for HuskyMaps
//!
//! hm-ch turns a road network into a contraction hierarchy: every navigable node is assigned a
//! contraction order and a depth, and shortcut edges are inserted so that upward-only searches
//! from both endpoints of a query find the same distances as a plain Dijkstra search.
//!
//! ## Pipeline overview
//! 1. Loading ([`load_graph`](crate::model::load_graph)) – read nodes and ways from a JSON graph
//!    file into a [`hm_core::WeightedGraph`], weighting each road segment by great-circle distance.
//! 2. Contraction ([`CH`](crate::contraction_hierarchies::CH)) – contract the graph in rounds of
//!    independent nodes until every navigable node has an order.
//! 3. Reporting ([`HierarchySummary`](crate::pipeline::HierarchySummary)) – node, edge, round, and
//!    depth statistics of the result.
//!
//! The entry point [`pipeline::run`] chains these stages. Long-running stages are annotated with
//! [`tracing`] spans so that callers can observe progress and timing.

pub mod config;
pub mod contraction_hierarchies;
pub mod model;
pub mod pipeline;

pub use config::ContractionConfig;
pub use contraction_hierarchies::{
    ContractableNode,
    ContractionState,
    CH,
};
pub use pipeline::HierarchySummary;
