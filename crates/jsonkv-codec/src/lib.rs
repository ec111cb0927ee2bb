//! Value codec for JSONKV.
//!
//! A flat store only holds string-to-string entries. This crate defines how
//! one typed value becomes one stored string and back: every entry is its
//! own JSON text fragment, so `1` is stored as `"1"`, `"foo"` as `"\"foo\""`
//! and `[1, "two"]` as `"[1, \"two\"]"`.
//!
//! # Modules
//!
//! - [`codec`] — [`ValueCodec`]: encode, decode, and mapping encode
//! - [`rule`] — [`EncodeRule`] table for special-cased types (timestamps)
//! - [`entry`] — [`Encodable`], values of mixed types in one mapping
//! - [`format`] — [`SpacedFormatter`], the stored text layout
//! - [`error`] — [`DecodeError`] and [`EncodeError`]
//!
//! The free functions [`encode`], [`decode`] and [`encode_mapping`] use a
//! shared codec with the default rules.

pub mod codec;
pub mod entry;
pub mod error;
mod finite;
pub mod format;
pub mod rule;

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;
use serde_json::Value;

pub use codec::ValueCodec;
pub use entry::Encodable;
pub use error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
pub use format::SpacedFormatter;
pub use rule::{iso_aware, iso_naive, timestamp_rules, EncodeRule, TypeRule};

static DEFAULT_CODEC: LazyLock<ValueCodec> = LazyLock::new(ValueCodec::new);

/// The shared codec with the built-in rules.
pub fn default_codec() -> &'static ValueCodec {
    &DEFAULT_CODEC
}

/// Encode one value with the default codec.
pub fn encode<T: Serialize + Any>(value: &T) -> EncodeResult<String> {
    DEFAULT_CODEC.encode(value)
}

/// Decode stored text with the default codec.
pub fn decode(raw: &str) -> DecodeResult<Value> {
    DEFAULT_CODEC.decode(raw)
}

/// Encode every value of a mapping with the default codec.
pub fn encode_mapping<I, K, V>(entries: I) -> EncodeResult<BTreeMap<String, String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Encodable>,
{
    DEFAULT_CODEC.encode_mapping(entries)
}
