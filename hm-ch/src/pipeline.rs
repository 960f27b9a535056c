//! End-to-end hierarchy construction: load the road graph, contract it, and report.

use std::path::Path;
use std::time::{
    Duration,
    Instant,
};

use anyhow::{
    Context,
    Result,
};
use indicatif::{
    ProgressBar,
    ProgressFinish,
    ProgressStyle,
};
use serde::Serialize;
use tracing::{
    info,
    instrument,
};

use crate::config::ContractionConfig;
use crate::contraction_hierarchies::CH;
use crate::model::load_graph;

/// Statistics about a finished hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchySummary {
    /// All nodes in the graph, including non-navigable place markers.
    pub nodes: usize,
    /// Nodes that took part in contraction.
    pub navigable_nodes: usize,
    /// Directed edges loaded from the input.
    pub original_edges: usize,
    /// Directed shortcut edges added during contraction.
    pub shortcut_edges: usize,
    /// Number of contraction rounds.
    pub rounds: usize,
    /// Nodes contracted in each round.
    pub round_sizes: Vec<usize>,
    /// Largest depth assigned to any node.
    pub max_depth: usize,
    /// Wall-clock construction time.
    pub elapsed_secs: f64,
}

/// Load the graph file at `input` and contract it completely.
#[instrument(skip(config))]
pub fn run(input: &Path, config: &ContractionConfig) -> Result<HierarchySummary> {
    let graph = load_graph(input)?;
    let nodes = graph.node_count();
    let original_edges = graph.edge_count();
    info!(nodes, edges = original_edges, "loaded road graph");

    let mut ch = CH::new(graph, config)?;
    let navigable_nodes = ch.remaining();

    let pb = ProgressBar::new(navigable_nodes as u64)
        .with_style(
            ProgressStyle::default_bar()
                .template(concat!(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/blue}] ",
                    "{pos}/{len} contracted ({percent}%) {msg}",
                ))
                .context("invalid progress bar template")?,
        )
        .with_message("Contracting")
        .with_finish(ProgressFinish::AndLeave);
    pb.enable_steady_tick(Duration::from_millis(100));

    let timer = Instant::now();
    let mut round_sizes = Vec::new();
    ch.contraction_hierarchy_with_progress(|summary| {
        round_sizes.push(summary.contracted.len());
        pb.inc(summary.contracted.len() as u64);
        pb.set_message(format!("round {}", summary.round + 1));
    })?;
    pb.finish_using_style();

    let max_depth = ch.state().iter().map(|(_, n)| n.depth()).max().unwrap_or(0);
    Ok(HierarchySummary {
        nodes,
        navigable_nodes,
        original_edges,
        shortcut_edges: ch.shortcut_count(),
        rounds: ch.rounds(),
        round_sizes,
        max_depth,
        elapsed_secs: timer.elapsed().as_secs_f64(),
    })
}

/// Write `summary` as pretty-printed JSON to `path`.
#[instrument(skip(summary))]
pub fn write_summary(path: &Path, summary: &HierarchySummary) -> Result<()> {
    let file =
        std::fs::File::create(path).with_context(|| format!("could not create summary file {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)?;
    info!("summary written to {}", path.display());
    Ok(())
}
