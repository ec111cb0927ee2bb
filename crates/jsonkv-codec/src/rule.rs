//! Encode rules: the codec's table of special-cased types.
//!
//! A rule pairs a type predicate with an encode function. The codec consults
//! its rules in registration order before falling back to plain JSON
//! serialization, so supporting a new special type means registering a rule
//! rather than adding a branch to the codec.
//!
//! The built-in rules write timestamps as their ISO-8601 text. That mapping
//! is one-way: decoding yields the string, never the timestamp.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Timelike, Utc};
use serde_json::Value;

/// A (type predicate, encode function) pair consulted by the codec.
pub trait EncodeRule: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Return the JSON value to store if this rule applies to `value`.
    fn apply(&self, value: &dyn Any) -> Option<Value>;
}

/// A rule matching exactly one concrete type `T`.
pub struct TypeRule<T, F> {
    name: &'static str,
    encode: F,
    _type: PhantomData<fn(&T)>,
}

impl<T, F> TypeRule<T, F>
where
    T: Any,
    F: Fn(&T) -> Value + Send + Sync,
{
    /// Create a rule that encodes every `T` with `encode`.
    pub fn new(name: &'static str, encode: F) -> Self {
        Self {
            name,
            encode,
            _type: PhantomData,
        }
    }
}

impl<T, F> EncodeRule for TypeRule<T, F>
where
    T: Any,
    F: Fn(&T) -> Value + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, value: &dyn Any) -> Option<Value> {
        value.downcast_ref::<T>().map(&self.encode)
    }
}

impl<T, F> fmt::Debug for TypeRule<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRule").field("name", &self.name).finish()
    }
}

const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

fn micros_layout(nanos: u32) -> &'static str {
    if nanos / 1_000 == 0 {
        ISO_SECONDS
    } else {
        ISO_MICROS
    }
}

/// ISO-8601 text for a naive timestamp.
///
/// Fractional seconds appear only when at least one microsecond and are
/// written at microsecond precision; anything finer is dropped.
pub fn iso_naive(ts: &NaiveDateTime) -> String {
    let layout = micros_layout(ts.nanosecond());
    ts.format(layout).to_string()
}

/// ISO-8601 text for an offset-aware timestamp, e.g.
/// `2024-01-02T03:04:05+00:00`.
pub fn iso_aware<Tz>(ts: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let layout = micros_layout(ts.nanosecond());
    format!("{}{}", ts.format(layout), ts.format("%:z"))
}

/// The timestamp rules every default codec starts with.
pub fn timestamp_rules() -> Vec<Box<dyn EncodeRule>> {
    vec![
        Box::new(TypeRule::new("datetime-utc", |ts: &DateTime<Utc>| {
            Value::String(iso_aware(ts))
        })),
        Box::new(TypeRule::new("datetime-fixed", |ts: &DateTime<FixedOffset>| {
            Value::String(iso_aware(ts))
        })),
        Box::new(TypeRule::new("datetime-local", |ts: &DateTime<Local>| {
            Value::String(iso_aware(ts))
        })),
        Box::new(TypeRule::new("datetime-naive", |ts: &NaiveDateTime| {
            Value::String(iso_naive(ts))
        })),
    ]
}
