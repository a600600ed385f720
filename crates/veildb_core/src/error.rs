//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// A missing key is never an error; reads surface absence as `Option` and
/// existence checks as `bool`. Engine failures are fatal at this layer and
/// carry the engine's diagnostic text.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to encode a key or value.
    #[error("codec error: {0}")]
    Codec(#[from] veildb_codec::CodecError),

    /// The underlying engine reported a failure other than not-found.
    #[error("engine error: {message}")]
    Engine {
        /// Diagnostic text reported by the engine.
        message: String,
    },
}

impl StoreError {
    /// Creates an engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        Self::engine(err.to_string())
    }
}
