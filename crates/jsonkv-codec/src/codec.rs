use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::entry::{Encodable, ErasedValue};
use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::format::SpacedFormatter;
use crate::rule::{timestamp_rules, EncodeRule};

/// Encodes single values to their stored JSON text and decodes them back.
///
/// Each stored entry is a self-contained JSON fragment; there is never one
/// document for the whole map.
///
/// ```
/// use jsonkv_codec::ValueCodec;
/// use serde_json::json;
///
/// let codec = ValueCodec::new();
/// assert_eq!(codec.encode(&1).unwrap(), "1");
/// assert_eq!(codec.encode(&json!([1, "two"])).unwrap(), "[1, \"two\"]");
/// assert_eq!(codec.decode("\"foo\"").unwrap(), json!("foo"));
/// ```
pub struct ValueCodec {
    rules: Vec<Box<dyn EncodeRule>>,
    ensure_ascii: bool,
}

impl ValueCodec {
    /// A codec with the built-in timestamp rules.
    pub fn new() -> Self {
        Self {
            rules: timestamp_rules(),
            ensure_ascii: true,
        }
    }

    /// A codec with no special-cased types at all.
    pub fn without_default_rules() -> Self {
        Self {
            rules: Vec::new(),
            ensure_ascii: true,
        }
    }

    /// Register a rule. Rules added later are consulted after earlier ones.
    pub fn with_rule<R: EncodeRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Whether non-ASCII characters are written as `\uXXXX` escapes.
    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    /// Names of the registered rules, in consultation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Encode one value to its stored JSON text.
    ///
    /// A value matched by a rule is stored as whatever the rule returns;
    /// everything else is serialized as-is. Non-finite floats are rejected
    /// rather than written as `null`.
    ///
    /// Rules match on the concrete type, so `T` must be `'static`: encode
    /// borrowed text as `&'static str` or as an owned `String`.
    pub fn encode<T>(&self, value: &T) -> EncodeResult<String>
    where
        T: Serialize + Any,
    {
        self.encode_erased(value)
    }

    /// Encode one type-erased entry, consulting the rules with its
    /// original type.
    pub fn encode_entry(&self, entry: &Encodable) -> EncodeResult<String> {
        self.encode_erased(entry.erased())
    }

    fn encode_erased(&self, value: &dyn ErasedValue) -> EncodeResult<String> {
        for rule in &self.rules {
            if let Some(special) = rule.apply(value.as_any()) {
                debug!(rule = rule.name(), "encode rule applied");
                return self.write(&special);
            }
        }
        self.write(value)
    }

    fn write(&self, value: &dyn ErasedValue) -> EncodeResult<String> {
        if let Some(float) = value.non_finite() {
            return Err(EncodeError::NonFinite { value: float });
        }
        let mut buf = Vec::with_capacity(32);
        let mut ser = serde_json::Serializer::with_formatter(
            &mut buf,
            SpacedFormatter::new(self.ensure_ascii),
        );
        value.write_json(&mut ser)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Decode stored JSON text back into a value.
    pub fn decode(&self, raw: &str) -> DecodeResult<Value> {
        serde_json::from_str(raw).map_err(|source| DecodeError {
            raw: raw.to_string(),
            source,
        })
    }

    /// Encode every value of a mapping; keys pass through unchanged.
    ///
    /// Values may be of one type, or [`Encodable`] for mappings that mix
    /// types. Either way each value is encoded as [`encode`](Self::encode)
    /// would encode it on its own.
    pub fn encode_mapping<I, K, V>(&self, entries: I) -> EncodeResult<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Encodable>,
    {
        entries
            .into_iter()
            .map(|(key, value)| -> EncodeResult<(String, String)> {
                Ok((key.into(), self.encode_entry(&value.into())?))
            })
            .collect()
    }
}

impl Default for ValueCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValueCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCodec")
            .field("rules", &self.rule_names())
            .field("ensure_ascii", &self.ensure_ascii)
            .finish()
    }
}
