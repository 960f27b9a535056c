use hm_core::errors::GraphResult;
use hm_core::{
    NodeId,
    WeightedGraph,
};
use ordered_float::OrderedFloat;

use super::ch::ContractionState;
use super::shortcuts::ShortcutSet;

/// Contraction priority of one node in one round.
///
/// The shortcut set computed along the way is kept so that, if the node is selected for
/// contraction in the same round, it does not have to be computed again.
#[derive(Clone, Debug)]
pub struct Priority {
    /// The score; higher scores are contracted earlier within a 2-hop neighborhood.
    pub value: OrderedFloat<f64>,
    /// Shortcuts needed to contract the node now, if they had to be computed.
    shortcuts: Option<ShortcutSet>,
}

impl Priority {
    /// Hand over the cached shortcut set, leaving `None` behind.
    pub fn take_shortcuts(&mut self) -> Option<ShortcutSet> {
        self.shortcuts.take()
    }

    /// The cached shortcut set, if one was computed.
    pub const fn shortcuts(&self) -> Option<&ShortcutSet> {
        self.shortcuts.as_ref()
    }
}

/// Scores nodes by `edge_quotient_factor * edge_quotient + depth`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriorityEngine {
    /// Weight of the edge quotient term.
    edge_quotient_factor: f64,
}

impl PriorityEngine {
    /// Create an engine with the given edge quotient weight.
    pub const fn new(edge_quotient_factor: f64) -> Self {
        Self { edge_quotient_factor }
    }

    /// Compute the priority of the uncontracted `node` against the current core graph.
    ///
    /// The edge quotient is the number of shortcuts contracting `node` would need divided by the
    /// number of its edges leading to still-uncontracted neighbors. A node whose neighbors are all
    /// contracted has nothing to shortcut, so its priority is its depth alone.
    ///
    /// Reads only `graph` and `state`, so calls for distinct nodes may run concurrently.
    #[allow(clippy::cast_precision_loss)]
    pub fn priority(&self, graph: &WeightedGraph, state: &ContractionState, node: NodeId) -> GraphResult<Priority> {
        let neighbors = graph.neighbors(node)?;
        let depth = state.depth(node) as f64;

        let num_true_neighbors = neighbors
            .iter()
            .filter(|e| e.to != node && state.is_uncontracted(e.to))
            .count();
        if num_true_neighbors == 0 {
            return Ok(Priority { value: OrderedFloat(depth), shortcuts: None });
        }

        let shortcuts = ShortcutSet::from_neighbors(graph, state, node, &neighbors)?;
        let edge_quotient = shortcuts.len() as f64 / num_true_neighbors as f64;
        Ok(Priority {
            value: OrderedFloat(self.edge_quotient_factor.mul_add(edge_quotient, depth)),
            shortcuts: Some(shortcuts),
        })
    }
}

/// True iff node `x` with priority `px` wins against node `y` with priority `py`.
///
/// Higher priority wins; equal priorities go to the lower identifier, so exactly one of any two
/// distinct nodes wins regardless of evaluation order.
pub fn outranks(x: NodeId, px: OrderedFloat<f64>, y: NodeId, py: OrderedFloat<f64>) -> bool {
    px > py || (px == py && x < y)
}
