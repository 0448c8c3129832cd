//! Configuration and constants for the CLI.

/// Current stats schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Separator between the function descriptor and the library path on a frame line
pub const FRAME_SEPARATOR: &str = " in ";

/// Marker token that opens a count-terminator line
pub const COUNT_MARKER: &str = "###ncalls";

/// Verbose namespace prefixes replaced by short aliases in function text
pub const NAMESPACE_ALIASES: &[(&str, &str)] = &[("ROOT::Minuit2", "RM")];

/// Default name of the emitted DOT document
pub const DEFAULT_GRAPH_NAME: &str = "callgraph";
