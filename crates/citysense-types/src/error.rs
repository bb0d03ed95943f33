//! Error types for record parsing in citysense-types.

use thiserror::Error;

/// Errors that can occur when interpreting a stored sensor reading.
///
/// These describe a single malformed record. Aggregations absorb them
/// per record instead of failing the whole operation.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The timestamp is not an ISO-8601 date-time we can read.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A record is missing a field or has a field of the wrong shape.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}

/// Result type alias using citysense-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
