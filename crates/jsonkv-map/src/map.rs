use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use jsonkv_codec::{default_codec, DecodeResult, Encodable, ValueCodec};
use jsonkv_store::{FlatStore, FlatStoreOwner, StoreError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{MapError, MapResult};
use crate::iter::{Items, Values};

/// A decoded view over one flat-store field of an owner.
///
/// The map holds a snapshot of the field plus an exclusive borrow of the
/// owner. Reads decode entries from the snapshot on demand. Every mutation
/// computes the complete next flat store and hands it to
/// [`FlatStoreOwner::replace_field`] before the snapshot is updated, so the
/// owner never sees a partial patch and the map never runs ahead of it.
///
/// Build one per access and drop it afterwards; it is never persisted.
///
/// ```
/// use jsonkv_map::SelfSerializingMap;
/// use jsonkv_store::{FlatStoreOwner, InMemoryOwner};
/// use serde_json::json;
///
/// let mut owner = InMemoryOwner::new().with_empty_field("_data");
/// let mut data = SelfSerializingMap::bind(&mut owner, "_data").unwrap();
/// data.set("list", json!([1, "two"])).unwrap();
/// assert_eq!(data.get("list").unwrap(), json!([1, "two"]));
/// drop(data);
///
/// let stored = owner.read_field("_data").unwrap();
/// assert_eq!(stored["list"], "[1, \"two\"]");
/// ```
pub struct SelfSerializingMap<'a, O: FlatStoreOwner + ?Sized> {
    owner: &'a mut O,
    field: String,
    store: FlatStore,
    codec: &'a ValueCodec,
}

impl<'a, O: FlatStoreOwner + ?Sized> SelfSerializingMap<'a, O> {
    /// Wrap `store` as the current contents of `owner.field`.
    ///
    /// Hosts that already hold the snapshot use this directly; everyone
    /// else should prefer [`bind`](Self::bind).
    pub fn new(owner: &'a mut O, field: impl Into<String>, store: FlatStore) -> Self {
        Self {
            owner,
            field: field.into(),
            store,
            codec: default_codec(),
        }
    }

    /// Bind to `owner.field`, snapshotting its current flat store.
    pub fn bind(owner: &'a mut O, field: impl Into<String>) -> MapResult<Self> {
        let field = field.into();
        let store = owner
            .read_field(&field)
            .cloned()
            .ok_or_else(|| StoreError::UnknownField {
                field: field.clone(),
            })?;
        Ok(Self::new(owner, field, store))
    }

    /// Use `codec` instead of the shared default for every read and write.
    pub fn with_codec(mut self, codec: &'a ValueCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Name of the owner attribute this map writes back to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The raw snapshot, exactly as the owner holds it.
    pub fn flat_store(&self) -> &FlatStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    /// Keys in order. Nothing is decoded.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.store.keys().map(String::as_str)
    }

    // ---- Reads ----

    /// Decode the value stored under `key`.
    pub fn get(&self, key: &str) -> MapResult<Value> {
        let raw = self.store.get(key).ok_or_else(|| MapError::KeyNotFound {
            key: key.to_string(),
        })?;
        Ok(self.codec.decode(raw)?)
    }

    /// Decode the value under `key`, or return `default` untouched.
    ///
    /// Presence decides: a stored `0`, `""` or `null` is decoded and
    /// returned. An absent key returns `default` exactly as passed, even
    /// when it is a string that looks like encoded JSON.
    pub fn get_or_default(&self, key: &str, default: Value) -> MapResult<Value> {
        match self.store.get(key) {
            Some(raw) => Ok(self.codec.decode(raw)?),
            None => Ok(default),
        }
    }

    /// Decode the value under `key` into a concrete type.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> MapResult<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).map_err(|source| MapError::Conversion {
            key: key.to_string(),
            source,
        })
    }

    /// Decoded entries, recomputed from the current snapshot on every call.
    pub fn items(&self) -> Items<'_> {
        Items {
            inner: self.store.iter(),
            codec: self.codec,
        }
    }

    /// Decoded values, recomputed from the current snapshot on every call.
    pub fn values(&self) -> Values<'_> {
        Values {
            inner: self.store.values(),
            codec: self.codec,
        }
    }

    /// Decode every entry, failing on the first undecodable one.
    pub fn to_decoded(&self) -> MapResult<BTreeMap<String, Value>> {
        self.items()
            .map(|(key, value)| -> MapResult<(String, Value)> { Ok((key.to_string(), value?)) })
            .collect()
    }

    // ---- Writes ----

    /// Store `value` under `key` and write the full store through.
    pub fn set<K, V>(&mut self, key: K, value: V) -> MapResult<()>
    where
        K: Into<String>,
        V: Into<Encodable>,
    {
        let encoded = self.codec.encode_entry(&value.into())?;
        let mut next = self.store.clone();
        next.insert(key.into(), encoded);
        self.write_through(next)
    }

    /// Merge `entries` over a copy of the store and write it through.
    ///
    /// Conflicting keys are overwritten; keys not in `entries` are kept.
    /// Nothing is written if any value fails to encode. Use [`Encodable`]
    /// values to mix types in one call.
    pub fn update<I, K, V>(&mut self, entries: I) -> MapResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Encodable>,
    {
        let encoded = self.codec.encode_mapping(entries)?;
        let mut next = self.store.clone();
        next.extend(encoded);
        self.write_through(next)
    }

    /// Drop `key` and write the full store through.
    ///
    /// Returns `false` without writing if the key was absent.
    pub fn remove(&mut self, key: &str) -> MapResult<bool> {
        if !self.store.contains_key(key) {
            return Ok(false);
        }
        let mut next = self.store.clone();
        next.remove(key);
        self.write_through(next)?;
        Ok(true)
    }

    fn write_through(&mut self, next: FlatStore) -> MapResult<()> {
        let entries = next.len();
        self.owner.replace_field(&self.field, next.clone())?;
        self.store = next;
        debug!(field = %self.field, entries, "flat store written through");
        Ok(())
    }

    // ---- Comparison ----

    /// Compare the fully decoded map against `other`.
    pub fn equals(&self, other: &BTreeMap<String, Value>) -> MapResult<bool> {
        Ok(self.to_decoded()? == *other)
    }

    /// Ordering between maps of JSON values is not defined.
    ///
    /// Always returns [`MapError::OrderingUnsupported`].
    pub fn compare(&self, _other: &BTreeMap<String, Value>) -> MapResult<Ordering> {
        Err(MapError::OrderingUnsupported)
    }

    fn equals_json(&self, other: &serde_json::Map<String, Value>) -> MapResult<bool> {
        let decoded = self.to_decoded()?;
        Ok(decoded.len() == other.len()
            && decoded
                .iter()
                .all(|(key, value)| other.get(key) == Some(value)))
    }
}

impl<O: FlatStoreOwner + ?Sized> PartialEq<BTreeMap<String, Value>> for SelfSerializingMap<'_, O> {
    /// Undecodable entries never compare equal.
    fn eq(&self, other: &BTreeMap<String, Value>) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl<O: FlatStoreOwner + ?Sized> PartialEq<SelfSerializingMap<'_, O>> for BTreeMap<String, Value> {
    fn eq(&self, other: &SelfSerializingMap<'_, O>) -> bool {
        other == self
    }
}

impl<O: FlatStoreOwner + ?Sized> PartialEq<serde_json::Map<String, Value>>
    for SelfSerializingMap<'_, O>
{
    fn eq(&self, other: &serde_json::Map<String, Value>) -> bool {
        self.equals_json(other).unwrap_or(false)
    }
}

impl<O: FlatStoreOwner + ?Sized> PartialEq<SelfSerializingMap<'_, O>>
    for serde_json::Map<String, Value>
{
    fn eq(&self, other: &SelfSerializingMap<'_, O>) -> bool {
        other == self
    }
}

impl<'m, O: FlatStoreOwner + ?Sized> IntoIterator for &'m SelfSerializingMap<'_, O> {
    type Item = (&'m str, DecodeResult<Value>);
    type IntoIter = Items<'m>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

/// Canonical text of the decoded map, e.g. `{"int": 1, "string": "foo"}`.
///
/// An undecodable entry is shown as its raw text in a JSON string.
impl<O: FlatStoreOwner + ?Sized> fmt::Display for SelfSerializingMap<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decoded: serde_json::Map<String, Value> = self
            .store
            .iter()
            .map(|(key, raw)| {
                let value = self
                    .codec
                    .decode(raw)
                    .unwrap_or_else(|_| Value::String(raw.clone()));
                (key.clone(), value)
            })
            .collect();
        let text = self
            .codec
            .encode(&Value::Object(decoded))
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<O: FlatStoreOwner + ?Sized> fmt::Debug for SelfSerializingMap<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfSerializingMap")
            .field("field", &self.field)
            .field("store", &self.store)
            .finish()
    }
}
