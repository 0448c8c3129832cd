//! Output writers for the aggregated call graph.
//!
//! This module handles writing data to disk in various formats:
//! - DOT (GraphViz) call graph documents
//! - JSON graph statistics

pub mod dot;
pub mod json;

// Re-export main functions
pub use dot::{render_dot, write_dot};
pub use json::{read_stats, write_stats};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate that an output path is writable
///
/// **Private** - shared by the format writers
pub(crate) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create the parent directories of an output path if needed
///
/// **Private** - shared by the format writers
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
