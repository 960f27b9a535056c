use std::collections::HashMap;
use std::time::Instant;

use anyhow::{
    ensure,
    Context,
    Result,
};
use hm_core::errors::GraphResult;
use hm_core::{
    NodeId,
    WeightedGraph,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{
    debug,
    info,
    instrument,
};

use super::heuristic::{
    outranks,
    Priority,
    PriorityEngine,
};
use super::shortcuts::ShortcutSet;
use crate::config::ContractionConfig;

/// Contraction metadata for one navigable node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ContractableNode {
    /// The round in which the node was contracted; `None` while it is still part of the core.
    order: Option<usize>,
    /// Set once, at contraction time.
    depth: usize,
}

impl ContractableNode {
    /// The round in which this node was contracted, if it has been.
    pub const fn contraction_order(&self) -> Option<usize> {
        self.order
    }

    /// The node's hierarchy depth (0 until contracted).
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// True once the node has been removed from the core graph.
    pub const fn is_contracted(&self) -> bool {
        self.order.is_some()
    }

    /// Mark the node contracted in round `order`.
    ///
    /// # Panics
    ///
    /// A node can only be contracted once.
    fn contract(&mut self, id: NodeId, order: usize, depth: usize) {
        assert!(
            self.order.is_none(),
            "attempted to contract node {id} in round {order}, but it was already contracted in round {:?}",
            self.order
        );
        self.order = Some(order);
        self.depth = depth;
    }
}

/// Contraction metadata for every node that takes part in the hierarchy.
///
/// Nodes that were not navigable when construction started have no entry: they are never
/// contracted, and searches and independence tests treat them as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContractionState {
    /// Per-node metadata, keyed by node id.
    nodes: HashMap<NodeId, ContractableNode>,
}

impl ContractionState {
    /// Seed an uncontracted entry for every navigable node of `graph`.
    pub fn from_navigable(graph: &WeightedGraph) -> GraphResult<Self> {
        let mut nodes = HashMap::new();
        for id in graph.vertices() {
            if graph.is_navigable(id)? {
                nodes.insert(id, ContractableNode::default());
            }
        }
        Ok(Self { nodes })
    }

    /// Metadata for `id`, if it takes part in the hierarchy.
    pub fn get(&self, id: NodeId) -> Option<&ContractableNode> {
        self.nodes.get(&id)
    }

    /// True iff `id` takes part in the hierarchy and is still in the core graph.
    pub fn is_uncontracted(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| !n.is_contracted())
    }

    /// Depth of `id`, 0 for nodes outside the hierarchy.
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes.get(&id).map_or(0, ContractableNode::depth)
    }

    /// Number of nodes taking part in the hierarchy.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no node takes part in the hierarchy.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over `(id, metadata)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ContractableNode)> {
        self.nodes.iter().map(|(&id, n)| (id, n))
    }

    /// Contract `id`.
    ///
    /// # Panics
    ///
    /// `id` must take part in the hierarchy and must not already be contracted.
    pub(super) fn contract(&mut self, id: NodeId, order: usize, depth: usize) {
        self.nodes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("attempted to contract node {id}, which is not part of the hierarchy"))
            .contract(id, order, depth);
    }
}

/// What happened in one contraction round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    /// Zero-based round number; also the contraction order assigned in this round.
    pub round: usize,
    /// Nodes contracted in this round.
    pub contracted: Vec<NodeId>,
    /// Directed shortcut edges inserted (two per shortcut).
    pub shortcut_edges: usize,
    /// Nodes still uncontracted after this round.
    pub remaining: usize,
}

/// Everything computed during the read-only phase of a round.
struct RoundPlan {
    /// The independent set, sorted by id.
    independent: Vec<NodeId>,
    /// Shortcut set for each node of `independent`, in the same order.
    shortcuts: Vec<ShortcutSet>,
    /// New depth for each node of `independent`, in the same order.
    depths: Vec<usize>,
}

/// Round-based contraction hierarchy construction over a [`WeightedGraph`].
///
/// Each round works in two phases. First, against a frozen view of the graph and contraction
/// state, it scores every uncontracted node, selects the nodes that outrank every uncontracted
/// node within two hops, and computes their shortcuts; all of this runs on the worker pool.
/// Then, on the calling thread, it inserts the shortcuts in both directions and marks the
/// selected nodes contracted. No round starts before the previous one is committed.
pub struct CH {
    /// The road graph, growing by shortcut edges as construction proceeds.
    graph: WeightedGraph,
    /// Per-node contraction metadata.
    state: ContractionState,
    /// Ids of nodes still in the core graph, kept sorted.
    uncontracted: Vec<NodeId>,
    /// Node scoring.
    engine: PriorityEngine,
    /// Workers for the read-only phase of each round.
    pool: rayon::ThreadPool,
    /// Completed rounds; also the order assigned in the next round.
    rounds: usize,
    /// Directed shortcut edges inserted so far.
    shortcut_edges: usize,
}

impl CH {
    /// Prepare construction over `graph`; every navigable node starts uncontracted.
    ///
    /// Shortcuts are built from a node's outgoing edges and inserted in both directions, so the
    /// graph must be two-way: every edge needs a reverse edge of the same weight.
    pub fn new(graph: WeightedGraph, config: &ContractionConfig) -> Result<Self> {
        config.validate()?;
        ensure!(
            graph.is_symmetric(),
            "contraction requires a two-way graph, but some edge has no reverse edge of equal weight"
        );
        let state = ContractionState::from_navigable(&graph)?;
        let mut uncontracted: Vec<NodeId> = state.iter().map(|(id, _)| id).collect();
        uncontracted.sort_unstable();

        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("ch-worker-{i}"));
        if let Some(n) = config.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build().context("failed to build contraction worker pool")?;

        debug!(nodes = graph.node_count(), navigable = uncontracted.len(), "prepared contraction");
        Ok(Self {
            graph,
            state,
            uncontracted,
            engine: PriorityEngine::new(config.edge_quotient_factor),
            pool,
            rounds: 0,
            shortcut_edges: 0,
        })
    }

    /// The graph, including every shortcut inserted so far.
    pub const fn graph(&self) -> &WeightedGraph {
        &self.graph
    }

    /// Per-node contraction metadata.
    pub const fn state(&self) -> &ContractionState {
        &self.state
    }

    /// Number of completed rounds.
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of nodes not yet contracted.
    pub fn remaining(&self) -> usize {
        self.uncontracted.len()
    }

    /// True once every navigable node is contracted.
    pub fn is_done(&self) -> bool {
        self.uncontracted.is_empty()
    }

    /// Directed shortcut edges inserted so far.
    pub const fn shortcut_count(&self) -> usize {
        self.shortcut_edges
    }

    /// Take the finished (or partially finished) graph and metadata apart.
    pub fn into_parts(self) -> (WeightedGraph, ContractionState) {
        (self.graph, self.state)
    }

    /// Run one contraction round; returns `None` once no uncontracted nodes remain.
    #[instrument(skip(self), fields(round = self.rounds, remaining = self.uncontracted.len()))]
    pub fn contract_round(&mut self) -> Result<Option<RoundSummary>> {
        if self.uncontracted.is_empty() {
            return Ok(None);
        }

        let plan = {
            let (graph, state, engine, uncontracted) = (&self.graph, &self.state, &self.engine, &self.uncontracted);
            self.pool.install(|| plan_round(graph, state, engine, uncontracted))?
        };
        assert!(
            !plan.independent.is_empty(),
            "no independent node among {} uncontracted nodes in round {}",
            self.uncontracted.len(),
            self.rounds
        );

        let mut inserted = 0;
        for shortcut in plan.shortcuts.iter().flatten() {
            self.graph.add_weighted_edge(shortcut.edge());
            self.graph.add_weighted_edge(shortcut.reversed());
            inserted += 2;
        }
        for (&id, &depth) in plan.independent.iter().zip(&plan.depths) {
            self.state.contract(id, self.rounds, depth);
        }
        self.uncontracted.retain(|&id| !self.state.get(id).is_some_and(ContractableNode::is_contracted));

        let summary = RoundSummary {
            round: self.rounds,
            contracted: plan.independent,
            shortcut_edges: inserted,
            remaining: self.uncontracted.len(),
        };
        self.rounds += 1;
        self.shortcut_edges += inserted;

        debug!(
            contracted = summary.contracted.len(),
            shortcut_edges = summary.shortcut_edges,
            remaining = summary.remaining,
            "round committed"
        );
        Ok(Some(summary))
    }

    /// Contract every remaining node and return the finished hierarchy graph.
    pub fn contraction_hierarchy(&mut self) -> Result<&WeightedGraph> {
        self.contraction_hierarchy_with_progress(|_| {})
    }

    /// Contract every remaining node, calling `progress_callback` after each round.
    #[instrument(skip(self, progress_callback), fields(navigable = self.state.len()))]
    pub fn contraction_hierarchy_with_progress<F>(&mut self, mut progress_callback: F) -> Result<&WeightedGraph>
    where
        F: FnMut(&RoundSummary),
    {
        let timer = Instant::now();
        while let Some(summary) = self.contract_round()? {
            progress_callback(&summary);
        }
        info!(
            rounds = self.rounds,
            shortcut_edges = self.shortcut_edges,
            "contraction hierarchy generated in {:.3} seconds",
            timer.elapsed().as_secs_f64()
        );
        Ok(&self.graph)
    }
}

/// The read-only phase of a round: priorities, independent set, shortcuts, and depths.
fn plan_round(
    graph: &WeightedGraph,
    state: &ContractionState,
    engine: &PriorityEngine,
    uncontracted: &[NodeId],
) -> GraphResult<RoundPlan> {
    let mut priorities: HashMap<NodeId, Priority> = uncontracted
        .par_iter()
        .map(|&id| engine.priority(graph, state, id).map(|p| (id, p)))
        .collect::<GraphResult<_>>()?;

    let independent: Vec<NodeId> = uncontracted
        .par_iter()
        .filter_map(|&id| match is_independent(graph, state, &priorities, id) {
            Ok(true) => Some(Ok(id)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<GraphResult<_>>()?;

    let cached: Vec<(NodeId, Option<ShortcutSet>)> = independent
        .iter()
        .map(|&id| (id, priorities.get_mut(&id).and_then(Priority::take_shortcuts)))
        .collect();
    let shortcuts: Vec<ShortcutSet> = cached
        .into_par_iter()
        .map(|(id, cached)| match cached {
            Some(set) => Ok(set),
            None => ShortcutSet::for_node(graph, state, id),
        })
        .collect::<GraphResult<_>>()?;

    let depths: Vec<usize> = independent
        .par_iter()
        .map(|&id| contracted_depth(graph, state, id))
        .collect::<GraphResult<_>>()?;

    Ok(RoundPlan { independent, shortcuts, depths })
}

/// True iff `x` outranks every uncontracted node within two hops of it.
fn is_independent(
    graph: &WeightedGraph,
    state: &ContractionState,
    priorities: &HashMap<NodeId, Priority>,
    x: NodeId,
) -> GraphResult<bool> {
    let Some(px) = priorities.get(&x).map(|p| p.value) else {
        return Ok(false);
    };
    let beaten_by = |y: NodeId| -> bool {
        y != x
            && state.is_uncontracted(y)
            && priorities.get(&y).is_some_and(|py| !outranks(x, px, y, py.value))
    };

    for (y, _) in graph.adjacent(x)? {
        if beaten_by(y) {
            return Ok(false);
        }
        for (z, _) in graph.adjacent(y)? {
            if beaten_by(z) {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Depth assigned to `id` when it is contracted: one more than the deepest of its still
/// uncontracted neighbors, or 0 if it has none.
fn contracted_depth(graph: &WeightedGraph, state: &ContractionState, id: NodeId) -> GraphResult<usize> {
    Ok(graph
        .adjacent(id)?
        .filter(|&(y, _)| y != id && state.is_uncontracted(y))
        .map(|(y, _)| state.depth(y) + 1)
        .max()
        .unwrap_or(0))
}
