//! Error types for the value codec.

use thiserror::Error;

/// A stored entry could not be decoded as JSON text.
///
/// Kept distinct from the parser's own error so callers can tell storage
/// corruption apart from other failures. The raw text is carried verbatim.
#[derive(Debug, Error)]
#[error("no JSON value could be decoded from \"{raw}\"")]
pub struct DecodeError {
    /// The offending stored text.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

impl DecodeError {
    /// The stored text that failed to decode.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A value could not be written as JSON text.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The serializer rejected the value (e.g. a map with non-string keys).
    #[error("value could not be encoded as JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    /// NaN and the infinities have no JSON form.
    #[error("non-finite float {value} cannot be encoded as JSON")]
    NonFinite { value: f64 },

    /// The encoder emitted bytes that are not UTF-8.
    #[error("encoded value is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenience alias for decode operations.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Convenience alias for encode operations.
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
