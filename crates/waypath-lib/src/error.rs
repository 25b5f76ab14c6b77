use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the waypath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Unreachable targets, duplicate frontier inserts and an exhausted frontier
/// are ordinary outcomes of a query and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a query references a node the graph never declared.
    #[error("unknown node: {node}")]
    UnknownNode { node: NodeId },

    /// Raised by the loaders when an edge carries a negative or non-finite weight.
    #[error("edge {from} -> {to} has malformed weight {weight}; weights must be finite and non-negative")]
    MalformedWeight { from: NodeId, to: NodeId, weight: f64 },

    /// Raised when a line of an edge-list file cannot be parsed.
    #[error("failed to parse graph at line {line}: {message}")]
    GraphParse { line: usize, message: String },

    /// Neither a command-line path nor the environment named a graph file.
    #[error("no graph file given; pass --graph or set {}", crate::loader::GRAPH_ENV_VAR)]
    GraphNotConfigured,

    /// Graph file could not be located at the resolved path.
    #[error("graph file not found at {path}")]
    GraphNotFound { path: PathBuf },

    /// Raised when parsing an algorithm or frontier name fails.
    #[error("unsupported {kind} '{name}'; expected one of: {expected}")]
    UnsupportedOption {
        kind: &'static str,
        name: String,
        expected: &'static str,
    },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
