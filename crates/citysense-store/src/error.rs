//! Error types for citysense-store.

use std::path::PathBuf;

/// Result type for citysense-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in citysense-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A line of an import could not be turned into a reading.
    #[error("Invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        source: citysense_types::ParseError,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
