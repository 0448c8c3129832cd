//! stacktrace-dot CLI
//!
//! Reads a stack trace log and writes the aggregated call graph as a
//! DOT (GraphViz) file next to the input.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;

use stacktrace_dot::commands::{execute_convert, validate_args, ConvertArgs};
use stacktrace_dot::utils::config::DEFAULT_GRAPH_NAME;

/// Convert a stack trace log into a DOT call graph
#[derive(Parser, Debug)]
#[command(name = "stacktrace-dot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the input trace file
    trace_file: PathBuf,

    /// Output path for the DOT file (defaults to `<trace-file>.dot`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output path for JSON graph statistics
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Name of the emitted DOT graph
    #[arg(long, default_value = DEFAULT_GRAPH_NAME)]
    graph_name: String,

    /// Number of top hot edges to include in stats
    #[arg(long, default_value = "20")]
    top_edges: usize,

    /// Print text summary to stdout
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let args = ConvertArgs {
        trace_file: cli.trace_file,
        output_dot: cli.output,
        output_stats: cli.stats,
        graph_name: cli.graph_name,
        top_edges: cli.top_edges,
        print_summary: cli.summary,
    };

    // Validate args first
    validate_args(&args)?;

    // Execute conversion
    execute_convert(args)?;

    Ok(())
}
