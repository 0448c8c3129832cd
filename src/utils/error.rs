//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a stack trace log.
///
/// All of these are fatal for the current run: the input format is assumed
/// well-formed and no partial graph is salvaged from a bad file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error while reading trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid frame record: {0}")]
    InvalidFrameLine(String),

    #[error("Invalid count terminator: {0}")]
    InvalidCountLine(String),

    #[error("Count terminator with no open call path: {0}")]
    UnexpectedCount(String),

    #[error("Input ended while a call path was still open")]
    TruncatedInput,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
