//! Error types for the store's durability layer.
//!
//! Persistence failures are never propagated to callers of the store API:
//! the persistence task logs them and moves on. [`PersistError`] exists so
//! the sink seam has a concrete error type to report.

/// Errors that can occur while reading or writing the durability file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The board document could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
