use std::cmp::Reverse;
use std::collections::{
    BinaryHeap,
    HashMap,
};

use hm_core::errors::GraphResult;
use hm_core::{
    NodeId,
    WeightedGraph,
};
use ordered_float::OrderedFloat;
use tracing::trace;

use super::ch::ContractionState;
use super::shortcuts::Shortcut;

/// Frontier entry: `(distance + estimate, distance, node)`, ordered as a min-heap.
type FrontierEntry = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>, NodeId)>;

/// Decide whether `shortcut` must be added to preserve shortest-path distances once its `via`
/// node is removed.
///
/// Runs an A* search from the shortcut's source towards its destination over the current core
/// graph: only nodes that are still uncontracted are visited, and the node being contracted is
/// skipped entirely, which also excludes the two edges the shortcut would replace. The
/// great-circle distance to the destination orders the frontier.
///
/// The search stops as soon as the destination reaches the front of the frontier or the cheapest
/// frontier node is already farther from the source than the shortcut is long; past that point
/// no witness can beat the shortcut. The shortcut is required iff its weight is strictly less than
/// the best distance found to the destination (infinite if never reached).
pub fn shortcut_required(graph: &WeightedGraph, state: &ContractionState, shortcut: &Shortcut) -> GraphResult<bool> {
    let (source, target, via) = (shortcut.src(), shortcut.dest(), shortcut.via());
    let limit = shortcut.weight;

    let mut dist_to: HashMap<NodeId, f64> = HashMap::from([(source, 0.0)]);
    let mut frontier: BinaryHeap<FrontierEntry> = BinaryHeap::new();
    frontier.push(Reverse((OrderedFloat(graph.estimated_distance(source, target)?), OrderedFloat(0.0), source)));

    let mut settled = 0_usize;
    while let Some(&Reverse((_, OrderedFloat(distance), v))) = frontier.peek() {
        if distance > dist_to.get(&v).copied().unwrap_or(f64::INFINITY) {
            // superseded by a later, shorter entry for the same node
            frontier.pop();
            continue;
        }
        if v == target || limit < distance {
            break;
        }
        frontier.pop();
        settled += 1;

        for (w, weight) in graph.adjacent(v)? {
            if w == via || !state.is_uncontracted(w) {
                continue;
            }
            let candidate = distance + weight;
            if candidate < dist_to.get(&w).copied().unwrap_or(f64::INFINITY) {
                dist_to.insert(w, candidate);
                let priority = candidate + graph.estimated_distance(w, target)?;
                frontier.push(Reverse((OrderedFloat(priority), OrderedFloat(candidate), w)));
            }
        }
    }

    let witness = dist_to.get(&target).copied().unwrap_or(f64::INFINITY);
    trace!(source, target, via, limit, witness, settled, "witness search finished");
    Ok(limit < witness)
}
