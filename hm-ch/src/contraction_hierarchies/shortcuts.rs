use std::collections::BTreeMap;

use hm_core::errors::GraphResult;
use hm_core::{
    EdgeLabel,
    NodeId,
    WeightedEdge,
    WeightedGraph,
};
use itertools::Itertools;

use super::ch::ContractionState;
use super::witness::shortcut_required;

/// A candidate edge `src -> dest` replacing the two-hop path `src -> via -> dest`.
#[derive(Clone, Debug, PartialEq)]
pub struct Shortcut {
    /// The first half of the replaced path, `src -> via`.
    pub src_edge: WeightedEdge,
    /// The second half of the replaced path, `via -> dest`.
    pub dest_edge: WeightedEdge,
    /// Sum of the two replaced edge weights.
    pub weight: f64,
}

impl Shortcut {
    /// Build the shortcut through `via` from two of its outgoing edges, `via -> src` and
    /// `via -> dest`.
    ///
    /// The graph is two-way, so the reverse of `via -> src` stands in for `src -> via`.
    pub fn new(src_neighbor: &WeightedEdge, dest_neighbor: &WeightedEdge) -> Self {
        Self {
            src_edge: src_neighbor.flip(),
            dest_edge: dest_neighbor.clone(),
            weight: src_neighbor.weight + dest_neighbor.weight,
        }
    }

    /// The node the shortcut starts from.
    pub const fn src(&self) -> NodeId {
        self.src_edge.from
    }

    /// The node the shortcut leads to.
    pub const fn dest(&self) -> NodeId {
        self.dest_edge.to
    }

    /// The node the shortcut bypasses.
    pub const fn via(&self) -> NodeId {
        self.dest_edge.from
    }

    /// The forward graph edge `src -> dest`.
    pub fn edge(&self) -> WeightedEdge {
        WeightedEdge::new(self.src(), self.dest(), self.weight, EdgeLabel::Shortcut { via: self.via() })
    }

    /// The reverse graph edge `dest -> src`, with the same weight.
    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge::new(self.dest(), self.src(), self.weight, EdgeLabel::Shortcut { via: self.via() })
    }
}

/// The shortcuts that contracting a node would require.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortcutSet {
    /// The shortcuts that survived witness search.
    shortcuts: Vec<Shortcut>,
}

impl ShortcutSet {
    /// Compute the shortcut set for contracting `node` in the current core graph.
    pub fn for_node(graph: &WeightedGraph, state: &ContractionState, node: NodeId) -> GraphResult<Self> {
        let neighbors = graph.neighbors(node)?;
        Self::from_neighbors(graph, state, node, &neighbors)
    }

    /// Compute the shortcut set for contracting `via`, given a snapshot of its outgoing edges.
    ///
    /// Only the lightest edge towards each still-uncontracted neighbor other than `via` takes
    /// part; a heavier parallel edge can never yield a shorter path. Every unordered pair of those
    /// neighbors is tested once, and the caller inserts each surviving shortcut in both
    /// directions.
    pub fn from_neighbors(
        graph: &WeightedGraph,
        state: &ContractionState,
        via: NodeId,
        neighbors: &[WeightedEdge],
    ) -> GraphResult<Self> {
        let mut lightest: BTreeMap<NodeId, &WeightedEdge> = BTreeMap::new();
        for edge in neighbors.iter().filter(|e| e.to != via && state.is_uncontracted(e.to)) {
            lightest
                .entry(edge.to)
                .and_modify(|best| {
                    if edge.weight < best.weight {
                        *best = edge;
                    }
                })
                .or_insert(edge);
        }

        let mut shortcuts = Vec::new();
        for (src_edge, dest_edge) in lightest.values().tuple_combinations() {
            let shortcut = Shortcut::new(src_edge, dest_edge);
            if shortcut_required(graph, state, &shortcut)? {
                shortcuts.push(shortcut);
            }
        }
        Ok(Self { shortcuts })
    }

    /// Number of required shortcuts.
    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    /// True if contracting the node needs no shortcuts at all.
    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Iterate over the required shortcuts.
    pub fn iter(&self) -> std::slice::Iter<'_, Shortcut> {
        self.shortcuts.iter()
    }
}

impl IntoIterator for ShortcutSet {
    type IntoIter = std::vec::IntoIter<Shortcut>;
    type Item = Shortcut;

    fn into_iter(self) -> Self::IntoIter {
        self.shortcuts.into_iter()
    }
}

impl<'a> IntoIterator for &'a ShortcutSet {
    type IntoIter = std::slice::Iter<'a, Shortcut>;
    type Item = &'a Shortcut;

    fn into_iter(self) -> Self::IntoIter {
        self.shortcuts.iter()
    }
}
