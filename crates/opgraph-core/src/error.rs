//! Error types for loading operator catalogs.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while building an operator registry.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read operator catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the descriptor schema.
    #[error("Invalid operator catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Two operators share the same effective name.
    #[error("Operator '{name}' is registered more than once")]
    DuplicateOperator { name: String },
}
