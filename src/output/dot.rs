//! DOT (GraphViz) output writer.
//!
//! Renders a finished call graph as a directed-graph document: one
//! box-shaped node per registered function, one labeled arc per
//! caller -> callee adjacency.

use super::{create_parent_dirs, validate_output_path};
use crate::aggregator::CallGraph;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Render the graph as a DOT document string.
///
/// **Public** - main entry point for DOT serialization
///
/// Nodes are emitted in function id order and edges sorted by
/// (caller, callee), so the output for a given graph is stable. Node labels
/// carry the normalized function text and the library basename on two lines.
pub fn render_dot(graph: &CallGraph, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph {} {{\n", name));

    for (id, frame) in graph.functions() {
        out.push_str(&format!(
            "  {} [label=\"{}\\nlibrary: {}\", shape=box];\n",
            id,
            escape_label(&frame.function),
            escape_label(&frame.library)
        ));
    }

    let mut edges: Vec<_> = graph.edges().collect();
    edges.sort_by_key(|&(edge, _)| (edge.caller, edge.callee));

    for (edge, ncalls) in edges {
        out.push_str(&format!(
            "  {} -> {} [label=\"{}\"];\n",
            edge.caller, edge.callee, ncalls
        ));
    }

    out.push_str("}\n");
    out
}

/// Write the graph as a DOT file
///
/// **Public** - called by the convert command
///
/// # Arguments
/// * `graph` - Finished call graph
/// * `name` - Name of the DOT document (e.g., "callgraph")
/// * `output_path` - Path to output DOT file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_dot(
    graph: &CallGraph,
    name: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing call graph to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(render_dot(graph, name).as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Call graph written ({} nodes, {} edges)",
        graph.num_functions(),
        graph.num_edges()
    );

    Ok(())
}

/// Escape a label for embedding in a double-quoted DOT string
///
/// **Private** - internal helper for render_dot
fn escape_label(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
