//! Trace parsing and frame normalization.
//!
//! This module handles:
//! - Scanning the line-oriented stack trace log format
//! - Normalizing frame records into (function, library) pairs
//! - Yielding completed call paths one block at a time

pub mod frame;
pub mod trace;

// Re-export main types
pub use frame::{Frame, FrameNormalizer};
pub use trace::{CallPath, CallPathParser};
