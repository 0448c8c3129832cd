//! Summary statistics over a finished call graph.
//!
//! Hot edges are the caller -> callee adjacencies with the highest
//! accumulated call counts. These are the first places to look when a
//! profile is dominated by a few call sites.

use super::callgraph::CallGraph;
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

/// Summary of one aggregated call graph, written as the stats JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    /// Schema version for compatibility checking
    pub version: String,

    /// Path of the trace file the graph was built from
    pub trace_file: String,

    /// Number of unique functions registered
    pub num_functions: usize,

    /// Number of distinct caller -> callee adjacencies
    pub num_edges: usize,

    /// Sum of accumulated call counts over all edges
    pub total_calls: u64,

    /// Hottest edges, ranked by call count (descending)
    pub hot_edges: Vec<HotEdge>,

    /// Timestamp when the stats were generated
    pub generated_at: String,
}

impl GraphStats {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and the `--summary` output
    pub fn summary(&self) -> String {
        format!(
            "Functions: {} | Edges: {} | Total calls: {}",
            self.num_functions, self.num_edges, self.total_calls
        )
    }
}

/// One caller -> callee adjacency with its accumulated call count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotEdge {
    /// Normalized function text of the caller
    pub caller: String,

    /// Library the caller was found in
    pub caller_library: String,

    /// Normalized function text of the callee
    pub callee: String,

    /// Library the callee was found in
    pub callee_library: String,

    /// Accumulated call count for this adjacency
    pub ncalls: u64,

    /// Percentage of the total accumulated calls
    pub percentage: f64,
}

/// Calculate summary statistics for a finished graph
///
/// **Public** - main entry point for stats calculation
///
/// # Arguments
/// * `graph` - Finished call graph
/// * `trace_file` - Display path of the source trace file
/// * `top_n` - Number of top edges to include (e.g., 20)
pub fn calculate_stats(graph: &CallGraph, trace_file: &str, top_n: usize) -> GraphStats {
    GraphStats {
        version: SCHEMA_VERSION.to_string(),
        trace_file: trace_file.to_string(),
        num_functions: graph.num_functions(),
        num_edges: graph.num_edges(),
        total_calls: graph.total_calls(),
        hot_edges: calculate_hot_edges(graph, top_n),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Rank edges by accumulated call count and keep the top N
///
/// **Public** - returns hot edges sorted by count (descending)
pub fn calculate_hot_edges(graph: &CallGraph, top_n: usize) -> Vec<HotEdge> {
    debug!(
        "Calculating top {} hot edges from {} edges",
        top_n,
        graph.num_edges()
    );

    let total = graph.total_calls();

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| (a.0.caller, a.0.callee).cmp(&(b.0.caller, b.0.callee)))
    });

    edges
        .iter()
        .take(top_n)
        .filter_map(|&(edge, ncalls)| {
            let caller = graph.frame(edge.caller)?;
            let callee = graph.frame(edge.callee)?;

            Some(HotEdge {
                caller: caller.function.clone(),
                caller_library: caller.library.clone(),
                callee: callee.function.clone(),
                callee_library: callee.library.clone(),
                ncalls,
                percentage: if total > 0 {
                    (ncalls as f64 / total as f64) * 100.0
                } else {
                    0.0
                },
            })
        })
        .collect()
}
