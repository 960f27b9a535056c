#![deny(
    // Strict on purpose: an inline allow is cheaper than a missed lint, and flags the spot for review.
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
    clippy::missing_docs_in_private_items,
)]
//! HuskyMaps contraction hierarchy builder.
//!
//! Reads a JSON road graph, contracts it, and reports statistics about the resulting hierarchy.
//! See binary --help for more information.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hm_ch::config::ContractionConfig;
use tracing::info;

/// hm-ch command-line interface to build a contraction hierarchy over a road graph
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON graph file with `nodes` and `ways`.
    #[arg(short, long)]
    input: PathBuf,

    /// YAML file with contraction parameters; flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads for the parallel phases (defaults to one per core).
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Weight of the edge quotient in the node priority.
    #[arg(long, value_parser = parse_edge_quotient_factor)]
    edge_quotient_factor: Option<f64>,

    /// Write the hierarchy statistics as JSON to this path.
    #[arg(short, long)]
    summary: Option<PathBuf>,

    /// Logging verbosity level (`trace`, `debug`, `info`, `warn`, `error`).
    #[arg(short, long, default_value = "info")]
    verbosity: String,
}

/// Custom parser for `edge_quotient_factor` to enforce a finite, non-negative value
fn parse_edge_quotient_factor(s: &str) -> Result<f64, String> {
    let val: f64 = s.parse().map_err(|_| format!("'{s}' isn't a valid float number"))?;
    if val.is_finite() && val >= 0.0 {
        Ok(val)
    } else {
        Err(format!("value must be finite and non-negative, got: {val}"))
    }
}

/// Merge the config file (if any) with command-line overrides.
fn resolve_config(args: &Cli) -> Result<ContractionConfig> {
    let mut config = match &args.config {
        Some(path) => ContractionConfig::from_yaml_file(path)?,
        None => ContractionConfig::default(),
    };
    if let Some(threads) = args.threads {
        config.num_threads = Some(threads);
    }
    if let Some(factor) = args.edge_quotient_factor {
        config.edge_quotient_factor = factor;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    hm_core::logging::setup(&args.verbosity);

    let config = resolve_config(&args)?;
    info!(?config, "building contraction hierarchy from {}", args.input.display());

    let summary = hm_ch::pipeline::run(&args.input, &config)?;
    info!(
        nodes = summary.nodes,
        navigable = summary.navigable_nodes,
        original_edges = summary.original_edges,
        shortcut_edges = summary.shortcut_edges,
        rounds = summary.rounds,
        max_depth = summary.max_depth,
        "contraction finished in {:.3}s",
        summary.elapsed_secs
    );

    if let Some(path) = &args.summary {
        hm_ch::pipeline::write_summary(path, &summary)?;
    }
    Ok(())
}
