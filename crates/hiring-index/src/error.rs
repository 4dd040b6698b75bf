//! Index store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite error, including malformed query syntax. Shown as reported by the engine.
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Query the translator cannot express as an FTS5 match
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Table missing or not at the current schema version
    #[error("Index is not initialized; call initialize() first")]
    NotInitialized,

    /// File was written by a newer schema than this build understands
    #[error("Schema version mismatch: found {found}, expected {expected}")]
    SchemaVersion { found: i32, expected: i32 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
