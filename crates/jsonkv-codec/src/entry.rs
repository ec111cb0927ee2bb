//! Type-erased values for mixed-type mappings.

use std::any::{type_name, Any};
use std::fmt;

use serde::Serialize;

use crate::finite;
use crate::format::SpacedFormatter;

pub(crate) type JsonSerializer<'b> = serde_json::Serializer<&'b mut Vec<u8>, SpacedFormatter>;

/// Object-safe view of a `Serialize + Any` value.
pub(crate) trait ErasedValue {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    fn non_finite(&self) -> Option<f64>;
    fn write_json(&self, ser: &mut JsonSerializer<'_>) -> serde_json::Result<()>;
}

impl<T: Serialize + Any> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn non_finite(&self) -> Option<f64> {
        finite::first_non_finite(self)
    }

    fn write_json(&self, ser: &mut JsonSerializer<'_>) -> serde_json::Result<()> {
        self.serialize(ser)
    }
}

/// A value of any serializable type that keeps its concrete type.
///
/// Mappings whose values differ in type use this as the value type. The
/// codec still sees the original type, so encode rules such as the
/// timestamp rules fire for each entry exactly as they do for a single
/// value.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use jsonkv_codec::{encode_mapping, Encodable};
///
/// let when = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
/// let stored = encode_mapping([
///     ("when", Encodable::from(when)),
///     ("n", Encodable::from(1)),
/// ])
/// .unwrap();
/// assert_eq!(stored["when"], "\"2024-03-01T09:30:00+00:00\"");
/// assert_eq!(stored["n"], "1");
/// ```
pub struct Encodable(Box<dyn ErasedValue>);

impl Encodable {
    pub fn new<T: Serialize + Any>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Name of the wrapped value's concrete type.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub(crate) fn erased(&self) -> &dyn ErasedValue {
        &*self.0
    }
}

impl<T: Serialize + Any> From<T> for Encodable {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Encodable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Encodable").field(&self.type_name()).finish()
    }
}
