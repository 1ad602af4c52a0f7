//! Error types for the usage layer.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for usage-layer operations.
pub type UsageResult<T> = Result<T, UsageError>;

/// Errors that can occur while reading graphs or configuration.
#[derive(Debug, Error)]
pub enum UsageError {
    /// The graph file could not be read.
    #[error("Failed to read graph file {path}: {source}")]
    GraphIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph file was read but is not a valid graph.
    #[error("Invalid graph file {path}: {message}")]
    GraphFormat { path: PathBuf, message: String },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UsageError {
    /// Create a graph format error.
    pub fn graph_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::GraphFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a graph read error.
    pub fn graph_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::GraphIo {
            path: path.into(),
            source,
        }
    }
}
