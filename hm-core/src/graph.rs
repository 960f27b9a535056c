//! The mutable directed road graph.
//!
//! Nodes are keyed by their stable identifier from the map data; internally they live in a
//! `petgraph` [`DiGraph`] so that adjacency is stored once and parallel edges are kept as distinct
//! records. The graph never merges or deduplicates edges: an original road edge and one or more
//! shortcuts between the same pair of nodes legitimately coexist.

use std::collections::HashMap;

use petgraph::graph::{
    DiGraph,
    NodeIndex,
};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::trace;

use crate::errors::{
    GraphError,
    GraphResult,
};
use crate::geo::Location;

pub type NodeId = u64;

/// Relative slack when matching an edge weight against its reverse.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A physical location in the map: a spot along a road or a named place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub location: Location,
    pub name: Option<String>,
}

impl Node {
    pub const fn new(id: NodeId, location: Location) -> Self {
        Self { id, location, name: None }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Distinguishes loaded road edges from edges synthesized during preprocessing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// An edge from the input map data, optionally carrying the street name.
    Road { name: Option<String> },
    /// A synthesized edge standing in for the two-hop path through `via`.
    Shortcut { via: NodeId },
}

impl EdgeLabel {
    pub const fn is_shortcut(&self) -> bool {
        matches!(self, Self::Shortcut { .. })
    }
}

/// Edge payload stored in the underlying petgraph graph.
#[derive(Clone, Debug, PartialEq)]
struct EdgeData {
    weight: f64,
    label: EdgeLabel,
}

/// A directed, weighted edge as seen by callers of [`WeightedGraph::neighbors`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    pub label: EdgeLabel,
}

impl WeightedEdge {
    pub const fn new(from: NodeId, to: NodeId, weight: f64, label: EdgeLabel) -> Self {
        Self { from, to, weight, label }
    }

    /// The same edge traversed in the opposite direction.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            weight: self.weight,
            label: self.label.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WeightedGraph {
    graph: DiGraph<Node, EdgeData>,
    index: HashMap<NodeId, NodeIndex>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node` unless a node with the same identifier is already present.
    pub fn add_node(&mut self, node: Node) {
        if self.index.contains_key(&node.id) {
            return;
        }
        let id = node.id;
        let ix = self.graph.add_node(node);
        self.index.insert(id, ix);
    }

    /// Append a directed edge `from -> to`.
    ///
    /// Edges whose endpoints are not both present are dropped without error, so bulk loaders can
    /// feed partial data straight through.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64, label: EdgeLabel) {
        let (Some(&a), Some(&b)) = (self.index.get(&from), self.index.get(&to)) else {
            trace!(from, to, "dropping edge with a missing endpoint");
            return;
        };
        self.graph.add_edge(a, b, EdgeData { weight, label });
    }

    pub fn add_weighted_edge(&mut self, edge: WeightedEdge) {
        self.add_edge(edge.from, edge.to, edge.weight, edge.label);
    }

    /// Append a road edge weighted by the great-circle distance between its endpoints.
    pub fn add_edge_by_distance(&mut self, from: NodeId, to: NodeId, name: Option<String>) {
        let (Some(&a), Some(&b)) = (self.index.get(&from), self.index.get(&to)) else {
            trace!(from, to, "dropping edge with a missing endpoint");
            return;
        };
        let weight = self.graph[a].location.great_circle_distance(&self.graph[b].location);
        self.graph.add_edge(a, b, EdgeData { weight, label: EdgeLabel::Road { name } });
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.ix(id).map(|ix| &self.graph[ix])
    }

    pub fn location(&self, id: NodeId) -> GraphResult<Location> {
        self.node(id).map(|n| n.location)
    }

    /// Snapshot of the outgoing edges of `id`.
    ///
    /// The returned vector is a copy; edges added afterwards are not reflected in it.
    pub fn neighbors(&self, id: NodeId) -> GraphResult<Vec<WeightedEdge>> {
        let ix = self.ix(id)?;
        Ok(self
            .graph
            .edges_directed(ix, Direction::Outgoing)
            .map(|e| WeightedEdge {
                from: id,
                to: self.graph[e.target()].id,
                weight: e.weight().weight,
                label: e.weight().label.clone(),
            })
            .collect())
    }

    /// Borrowing view of `id`'s outgoing `(target, weight)` pairs, for search inner loops that
    /// have no use for edge labels.
    pub fn adjacent(&self, id: NodeId) -> GraphResult<impl Iterator<Item = (NodeId, f64)> + '_> {
        let ix = self.ix(id)?;
        Ok(self
            .graph
            .edges_directed(ix, Direction::Outgoing)
            .map(|e| (self.graph[e.target()].id, e.weight().weight)))
    }

    /// Great-circle distance between two nodes, an admissible estimate of the remaining path cost.
    pub fn estimated_distance(&self, a: NodeId, b: NodeId) -> GraphResult<f64> {
        Ok(self.location(a)?.great_circle_distance(&self.location(b)?))
    }

    /// True iff `id` has at least one outgoing edge.
    ///
    /// Place markers without any road attached are not navigable and take no part in routing.
    pub fn is_navigable(&self, id: NodeId) -> GraphResult<bool> {
        let ix = self.ix(id)?;
        Ok(self.graph.edges_directed(ix, Direction::Outgoing).next().is_some())
    }

    /// Snapshot of all node identifiers.
    pub fn vertices(&self) -> Vec<NodeId> {
        self.graph.node_weights().map(|n| n.id).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True iff every edge `a -> b` is matched by a reverse edge `b -> a` of the same weight, with
    /// parallel edges matched one to one. Self-loops are their own reverse.
    pub fn is_symmetric(&self) -> bool {
        let mut weights: HashMap<(NodeIndex, NodeIndex), Vec<f64>> = HashMap::new();
        for e in self.graph.edge_references().filter(|e| e.source() != e.target()) {
            weights.entry((e.source(), e.target())).or_default().push(e.weight().weight);
        }
        for list in weights.values_mut() {
            list.sort_by(f64::total_cmp);
        }

        weights.iter().all(|(&(a, b), forward)| {
            weights.get(&(b, a)).is_some_and(|backward| {
                forward.len() == backward.len()
                    && forward
                        .iter()
                        .zip(backward)
                        .all(|(x, y)| (x - y).abs() <= SYMMETRY_TOLERANCE * x.abs().max(1.0))
            })
        })
    }

    /// Every edge in the graph, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.graph.edge_references().map(|e| WeightedEdge {
            from: self.graph[e.source()].id,
            to: self.graph[e.target()].id,
            weight: e.weight().weight,
            label: e.weight().label.clone(),
        })
    }

    fn ix(&self, id: NodeId) -> GraphResult<NodeIndex> {
        self.index.get(&id).copied().ok_or(GraphError::NotFound(id))
    }
}

#[cfg(test)]
mod tests;
