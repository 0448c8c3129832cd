//! Frame-line parsing and function-name normalization.
//!
//! A frame line has the shape `<function-descriptor> in <library-path>`.
//! The function text is cleaned up for display: verbose namespace prefixes
//! are replaced by short aliases, and vector template instantiations of
//! simple types are collapsed to a `vector<T>` notation.

use crate::utils::config::{FRAME_SEPARATOR, NAMESPACE_ALIASES};
use crate::utils::error::ParseError;
use regex::Regex;
use std::path::Path;

/// A single frame observed in a call stack: the full name of the function,
/// and the library in which the function was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Normalized function signature text
    pub function: String,

    /// Basename of the binary or shared object containing the function
    pub library: String,
}

impl Frame {
    /// Create a new frame
    ///
    /// **Public** - constructor
    pub fn new(function: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            library: library.into(),
        }
    }
}

/// Normalizes raw frame lines into [`Frame`] values.
///
/// **Public** - owned by the trace parser, one instance per run
#[derive(Debug)]
pub struct FrameNormalizer {
    vector_rx: Regex,
}

impl FrameNormalizer {
    /// Create a normalizer with the vector-collapse pattern compiled.
    pub fn new() -> Self {
        // Two identical capture groups stand in for a backreference: the
        // allocator parameter must repeat the element type exactly.
        let vector_rx =
            Regex::new(r"std::__1::vector<([a-zA-Z:]+), std::__1::allocator<([a-zA-Z:]+)>>")
                .expect("vector pattern is valid");
        Self { vector_rx }
    }

    /// Parse the text from a frame line into a pleasant-to-read function
    /// name and library name form.
    ///
    /// **Public** - called by the trace parser for every frame record
    ///
    /// # Errors
    /// * `ParseError::InvalidFrameLine` - the `" in "` separator is missing
    pub fn parse_line(&self, line: &str) -> Result<Frame, ParseError> {
        let (function, library) = line.split_once(FRAME_SEPARATOR).ok_or_else(|| {
            ParseError::InvalidFrameLine(format!(
                "missing '{}' separator: {}",
                FRAME_SEPARATOR, line
            ))
        })?;

        Ok(Frame::new(
            self.normalize_function(function),
            normalize_library(library),
        ))
    }

    /// Clean up a function descriptor for display.
    ///
    /// The template cleanup is not powerful enough to handle nested template
    /// arguments; a `vector<Foo<Bar>, ...>` passes through unmodified.
    fn normalize_function(&self, raw: &str) -> String {
        let mut function = raw.to_string();

        for (verbose, alias) in NAMESPACE_ALIASES {
            function = function.replace(verbose, alias);
        }

        // Fix up vectors of simple types.
        self.vector_rx
            .replace_all(&function, |caps: &regex::Captures| {
                if &caps[1] == &caps[2] {
                    format!("vector<{}>", &caps[1])
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }
}

impl Default for FrameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip all directory segments from a library path.
///
/// **Private** - internal helper for parse_line
fn normalize_library(raw: &str) -> String {
    Path::new(raw)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.to_string())
}
