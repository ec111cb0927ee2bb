//! High-level SDK for JSONKV.
//!
//! Provides [`Record`], a ready-made host whose flat store is exposed through
//! a decoded, write-through `data` accessor, plus re-exports of the codec,
//! store and map crates. This is the main entry point for applications
//! embedding JSONKV.
//!
//! ```
//! use jsonkv_sdk::Record;
//! use serde_json::json;
//!
//! let mut record = Record::new();
//! record.data().set("int", 1).unwrap();
//! record.data().update([("list", json!([1, "two"]))]).unwrap();
//!
//! assert_eq!(record.flat_store()["int"], "1");
//! assert_eq!(record.flat_store()["list"], "[1, \"two\"]");
//! assert!(record.clean().is_ok());
//! ```

pub mod error;
pub mod record;

pub use error::{SdkError, SdkResult};
pub use record::{Record, DATA_FIELD};

// Re-export key types
pub use jsonkv_codec::{
    decode, default_codec, encode, encode_mapping, DecodeError, Encodable, EncodeError,
    EncodeRule, TypeRule, ValueCodec,
};
pub use jsonkv_map::{MapError, MapResult, SelfSerializingMap};
pub use jsonkv_store::{
    FlatStore, FlatStoreOwner, InMemoryOwner, StoreError, ValidationError, ValidationReport,
    Validator,
};
