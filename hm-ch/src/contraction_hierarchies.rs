//! Contraction Hierarchies speed up shortest path queries on road networks by preprocessing the
//! graph once.
//!
//! Preprocessing repeatedly removes ("contracts") nodes from the core graph. Whenever removing a
//! node `v` would destroy the only shortest path `u -> v -> w` between two of its neighbors, a
//! shortcut edge `u -> w` of the same length is added. The union of the original graph and all
//! shortcuts, together with the order in which nodes were contracted, is the eponymous
//! "Contraction Hierarchy": a query then only has to search upward (towards nodes contracted later)
//! from both endpoints until the two searches meet.
//!
//! Our construction is round based:
//!     * every uncontracted node is scored by a [`Priority`] (edge quotient plus depth);
//!     * the nodes that outrank every uncontracted node within two hops form an independent set,
//!       whose members can be contracted simultaneously without seeing each other's changes;
//!     * the independent set's shortcuts are computed (a [`witness`](shortcut_required) search
//!       discards candidates already covered by another path) and committed, and the members are
//!       marked contracted with the round number as their order.
//!
//! The scoring, selection, and shortcut phases only read the graph and run in parallel; the
//! commit phase is sequential. This module only builds the hierarchy and does not answer queries.

/// Round-based construction and per-node contraction metadata
mod ch;
/// Node priority scoring
mod heuristic;
/// Shortcut candidates for a node
mod shortcuts;
/// Local witness search
mod witness;

pub use ch::{
    ContractableNode,
    ContractionState,
    RoundSummary,
    CH,
};
pub use heuristic::{
    outranks,
    Priority,
    PriorityEngine,
};
pub use shortcuts::{
    Shortcut,
    ShortcutSet,
};
pub use witness::shortcut_required;
