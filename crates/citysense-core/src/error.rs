//! Error types for citysense-core.

/// Result type alias using citysense-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the analytics engine.
///
/// Only store-level failures are errors. Malformed records are absorbed
/// while aggregating, and an empty population yields empty results rather
/// than an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The record store could not serve a query.
    ///
    /// Propagated unchanged and never retried by the engine.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] citysense_store::Error),
}
