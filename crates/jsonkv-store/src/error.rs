//! Error types for flat store operations.

use thiserror::Error;

/// A stored entry failed validation.
///
/// Carries the offending key, the raw stored text, and the text the entry
/// would have if the raw value had been encoded as a plain string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "the value of key \"{key}\" does not appear to be valid JSON: {raw_value}. \
     Flat store values must be stored as JSON. Maybe you meant to use {suggested_encoding}?"
)]
pub struct ValidationError {
    pub key: String,
    pub raw_value: String,
    pub suggested_encoding: String,
}

/// Errors that can occur while reading or replacing an owner's flat store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The owner has no flat-store attribute with this name.
    #[error("owner has no flat store field: {field}")]
    UnknownField { field: String },

    /// The flat store contains an undecodable entry.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
