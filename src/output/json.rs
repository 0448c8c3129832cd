//! JSON stats output writer.
//!
//! Writes GraphStats structs to JSON files with proper formatting.

use super::{create_parent_dirs, validate_output_path};
use crate::aggregator::GraphStats;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write graph statistics to a JSON file
///
/// **Public** - called by the convert command when `--stats` is given
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_stats(stats: &GraphStats, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing graph stats to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, stats).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read graph statistics back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_stats(input_path: impl AsRef<Path>) -> Result<GraphStats, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading stats from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let stats: GraphStats = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(stats)
}
