use jsonkv_codec::{encode_mapping, Encodable};
use jsonkv_map::SelfSerializingMap;
use jsonkv_store::{FlatStore, FlatStoreOwner, StoreError, StoreResult, Validator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SdkResult;

/// Name of the hidden backing field on a [`Record`].
pub const DATA_FIELD: &str = "_data";

/// A ready-made host: one flat store behind a decoded `data` accessor.
///
/// The flat store is what gets persisted; it serializes as a plain
/// string-to-string object. Reading [`data`](Record::data) hands out a fresh
/// [`SelfSerializingMap`] that writes every change back here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    data: FlatStore,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing flat store, e.g. one loaded from storage.
    pub fn from_flat_store(data: FlatStore) -> Self {
        Self { data }
    }

    /// The backing flat store, exactly as it would be persisted.
    pub fn flat_store(&self) -> &FlatStore {
        &self.data
    }

    pub fn into_flat_store(self) -> FlatStore {
        self.data
    }

    /// A decoded, write-through view of the backing field.
    pub fn data(&mut self) -> SelfSerializingMap<'_, Self> {
        let snapshot = self.data.clone();
        SelfSerializingMap::new(self, DATA_FIELD, snapshot)
    }

    /// Replace the whole backing field with `entries`, encoding each value.
    ///
    /// An empty mapping leaves an empty flat store. Values of mixed types
    /// go in as [`Encodable`].
    pub fn set_data<I, K, V>(&mut self, entries: I) -> SdkResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Encodable>,
    {
        self.data = encode_mapping(entries)?;
        debug!(entries = self.data.len(), "record data replaced");
        Ok(())
    }

    /// Reset the backing field to an empty flat store.
    pub fn clear_data(&mut self) {
        self.data.clear();
    }

    /// Check every stored entry is valid JSON.
    ///
    /// Not called automatically; run it before persisting if wanted.
    pub fn clean(&self) -> SdkResult<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        Validator::validate(&self.data)?;
        Ok(())
    }
}

impl FlatStoreOwner for Record {
    fn read_field(&self, field: &str) -> Option<&FlatStore> {
        (field == DATA_FIELD).then_some(&self.data)
    }

    fn replace_field(&mut self, field: &str, store: FlatStore) -> StoreResult<()> {
        if field != DATA_FIELD {
            return Err(StoreError::UnknownField {
                field: field.to_string(),
            });
        }
        self.data = store;
        Ok(())
    }
}

impl From<FlatStore> for Record {
    fn from(data: FlatStore) -> Self {
        Self::from_flat_store(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::{json, Value};

    fn record(entries: &[(&str, &str)]) -> Record {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<FlatStore>()
            .into()
    }

    #[test]
    fn new_record_is_empty() {
        let mut rec = Record::new();
        assert!(rec.flat_store().is_empty());
        assert!(rec.data().is_empty());
    }

    #[test]
    fn data_reads_typed_values() {
        let mut rec = record(&[("int", "1"), ("string", "\"foo\""), ("list", "[1, \"two\"]")]);
        let data = rec.data();
        assert_eq!(data.get("int").unwrap(), json!(1));
        assert_eq!(data.get("string").unwrap(), json!("foo"));
        assert_eq!(data.get("list").unwrap(), json!([1, "two"]));
    }

    #[test]
    fn data_set_writes_back_to_record() {
        let mut rec = record(&[("int", "1")]);
        rec.data().set("int", 3).unwrap();
        assert_eq!(rec.flat_store()["int"], "3");
    }

    #[test]
    fn fresh_view_sees_previous_writes() {
        let mut rec = Record::new();
        rec.data().set("a", 1).unwrap();
        rec.data().update([("b", 2)]).unwrap();
        let data = rec.data();
        assert_eq!(data.get("a").unwrap(), json!(1));
        assert_eq!(data.get("b").unwrap(), json!(2));
    }

    #[test]
    fn set_data_encodes_whole_mapping() {
        let mut rec = record(&[("old", "1")]);
        rec.set_data([("x", json!(1)), ("y", json!({"z": [true]}))]).unwrap();
        assert_eq!(
            rec.flat_store(),
            &record(&[("x", "1"), ("y", "{\"z\": [true]}")]).into_flat_store()
        );
    }

    #[test]
    fn set_data_empty_clears() {
        let mut rec = record(&[("old", "1")]);
        rec.set_data(Vec::<(String, Value)>::new()).unwrap();
        assert!(rec.flat_store().is_empty());
    }

    #[test]
    fn set_data_with_timestamps() {
        let day = NaiveDate::from_ymd_opt(2023, 7, 4)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut rec = Record::new();
        rec.set_data([("day", day)]).unwrap();
        assert_eq!(rec.flat_store()["day"], "\"2023-07-04T12:00:00\"");
        assert_eq!(rec.data().get("day").unwrap(), json!("2023-07-04T12:00:00"));
    }

    #[test]
    fn set_data_with_mixed_values() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let mut rec = Record::new();
        rec.set_data([
            ("when", Encodable::from(when)),
            ("n", Encodable::from(1)),
            ("list", Encodable::from(json!([1, "two"]))),
        ])
        .unwrap();
        assert_eq!(
            rec.flat_store(),
            &record(&[
                ("when", "\"2024-03-01T09:30:00+00:00\""),
                ("n", "1"),
                ("list", "[1, \"two\"]"),
            ])
            .into_flat_store()
        );
    }

    #[test]
    fn set_data_non_finite_leaves_store_alone() {
        let mut rec = record(&[("old", "1")]);
        let err = rec.set_data([("x", 1.0), ("y", f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, SdkError::Encode(_)));
        assert_eq!(rec.flat_store()["old"], "1");
    }

    #[test]
    fn clear_data_empties_store() {
        let mut rec = record(&[("a", "1")]);
        rec.clear_data();
        assert_eq!(rec, Record::new());
    }

    #[test]
    fn clean_accepts_valid_and_empty() {
        assert!(Record::new().clean().is_ok());
        assert!(record(&[("a", "1"), ("b", "\"ok\"")]).clean().is_ok());
    }

    #[test]
    fn clean_rejects_raw_text() {
        let err = record(&[("a", "1"), ("b", "not valid json")]).clean().unwrap_err();
        match err {
            SdkError::Validation(v) => {
                assert_eq!(v.key, "b");
                assert_eq!(v.suggested_encoding, "\"not valid json\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut rec = Record::new();
        assert!(rec.read_field("_meta").is_none());
        assert!(rec.replace_field("_meta", FlatStore::new()).is_err());
        assert!(SelfSerializingMap::bind(&mut rec, "_meta").is_err());
    }

    #[test]
    fn serializes_as_flat_store() {
        let mut rec = Record::new();
        let ts = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        rec.data().set("when", ts).unwrap();
        rec.data().set("n", 5).unwrap();

        let text = serde_json::to_string(&rec).unwrap();
        assert_eq!(
            text,
            r#"{"n":"5","when":"\"2024-05-06T07:08:09+00:00\""}"#
        );
        let back: Record = serde_json::from_str(&text).unwrap();
        assert_eq!(back, rec);
    }
}
