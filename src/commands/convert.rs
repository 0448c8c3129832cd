//! Convert command implementation.
//!
//! The convert command:
//! 1. Opens the input trace file
//! 2. Parses call path blocks
//! 3. Folds them into the call graph
//! 4. Writes the DOT output
//! 5. Optionally writes stats and prints a summary

use crate::aggregator::{calculate_stats, CallGraph};
use crate::output::{write_dot, write_stats};
use crate::parser::CallPathParser;
use crate::utils::config::DEFAULT_GRAPH_NAME;
use anyhow::{Context, Result};
use log::{debug, info};
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the input trace file
    pub trace_file: PathBuf,

    /// Output path for the DOT file (None = `<trace-file>.dot`)
    pub output_dot: Option<PathBuf>,

    /// Output path for JSON graph stats (optional)
    pub output_stats: Option<PathBuf>,

    /// Name of the emitted DOT document
    pub graph_name: String,

    /// Number of top hot edges to include in stats
    pub top_edges: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            trace_file: PathBuf::new(),
            output_dot: None,
            output_stats: None,
            graph_name: DEFAULT_GRAPH_NAME.to_string(),
            top_edges: 20,
            print_summary: false,
        }
    }
}

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Convert command arguments
///
/// # Returns
/// Ok if conversion succeeds, Err with context if any step fails
///
/// # Errors
/// * Trace file open failures
/// * Malformed trace input (fatal, no partial output is written)
/// * File write errors
pub fn execute_convert(args: ConvertArgs) -> Result<()> {
    let start_time = Instant::now();

    println!("Processing file {}", args.trace_file.display());

    // Step 1: Open the trace file
    info!("Step 1/3: Reading trace file...");
    let file = File::open(&args.trace_file).with_context(|| {
        format!("Failed to open trace file {}", args.trace_file.display())
    })?;
    let parser = CallPathParser::new(BufReader::new(file));

    // Step 2: Aggregate call paths into the graph
    info!("Step 2/3: Aggregating call paths...");
    let mut graph = CallGraph::new();
    let mut num_paths = 0usize;
    for path in parser {
        let path = path.context("Failed to parse trace data")?;
        graph.append(path);
        num_paths += 1;
    }

    debug!(
        "Aggregated {} call paths: {} functions, {} edges",
        num_paths,
        graph.num_functions(),
        graph.num_edges()
    );

    // Step 3: Write outputs
    info!("Step 3/3: Writing output files...");
    let dot_path = args
        .output_dot
        .clone()
        .unwrap_or_else(|| default_dot_path(&args.trace_file));

    write_dot(&graph, &args.graph_name, &dot_path).context("Failed to write DOT output")?;

    info!("✓ Call graph written to: {}", dot_path.display());

    let stats = calculate_stats(&graph, &args.trace_file.to_string_lossy(), args.top_edges);

    if let Some(stats_path) = &args.output_stats {
        write_stats(&stats, stats_path).context("Failed to write graph stats")?;

        info!("✓ Graph stats written to: {}", stats_path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CALL GRAPH SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Trace file:  {}", args.trace_file.display());
        println!("Call paths:  {}", num_paths);
        println!("{}", stats.summary());
        for (i, edge) in stats.hot_edges.iter().take(10).enumerate() {
            println!(
                "  {}. {} -> {} ({} calls, {:.1}%)",
                i + 1,
                edge.caller,
                edge.callee,
                edge.ncalls,
                edge.percentage
            );
        }
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Conversion completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Default output path: the input path with `.dot` appended
///
/// **Private** - internal helper for execute_convert
fn default_dot_path(trace_file: &Path) -> PathBuf {
    let mut name = OsString::from(trace_file.as_os_str());
    name.push(".dot");
    PathBuf::from(name)
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.trace_file.as_os_str().is_empty() {
        anyhow::bail!("Trace file path cannot be empty");
    }

    if !args.trace_file.exists() {
        anyhow::bail!("Trace file does not exist: {}", args.trace_file.display());
    }

    if args.trace_file.is_dir() {
        anyhow::bail!("Trace file is a directory: {}", args.trace_file.display());
    }

    if args.graph_name.is_empty() {
        anyhow::bail!("Graph name cannot be empty");
    }

    if !args
        .graph_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        anyhow::bail!("Graph name must be alphanumeric (underscores allowed)");
    }

    if args.top_edges == 0 {
        anyhow::bail!("top_edges must be greater than 0");
    }

    if args.top_edges > 1000 {
        anyhow::bail!("top_edges is too large (max 1000)");
    }

    Ok(())
}
