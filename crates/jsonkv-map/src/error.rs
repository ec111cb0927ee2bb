//! Error types for bound map operations.

use jsonkv_codec::{DecodeError, EncodeError};
use jsonkv_store::StoreError;
use thiserror::Error;

/// Errors that can occur while reading or mutating a bound map.
#[derive(Debug, Error)]
pub enum MapError {
    /// Indexed read of a key that is not present.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// A stored entry is not valid JSON text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A value could not be encoded for storage.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The owner rejected the write-through.
    #[error("write-through failed: {0}")]
    Store(#[from] StoreError),

    /// A decoded value does not fit the requested type.
    #[error("value at key {key} has an unexpected shape: {source}")]
    Conversion {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Decoded JSON values have no ordering.
    #[error("ordering comparison is not supported for decoded maps")]
    OrderingUnsupported,
}

/// Convenience type alias for bound map operations.
pub type MapResult<T> = std::result::Result<T, MapError>;
