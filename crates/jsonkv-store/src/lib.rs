//! Flat store contract for JSONKV.
//!
//! A flat store is a string-to-string mapping whose values are each a JSON
//! text fragment. Hosts own their flat stores; this crate defines how the
//! rest of JSONKV talks to them and how their contents are checked.
//!
//! # Modules
//!
//! - [`owner`] — [`FlatStore`] and the [`FlatStoreOwner`] host contract
//! - [`memory`] — [`InMemoryOwner`] for tests and embedding
//! - [`validation`] — [`Validator`] and [`ValidationReport`]
//! - [`error`] — [`StoreError`] and [`ValidationError`]

pub mod error;
pub mod memory;
pub mod owner;
pub mod validation;

pub use error::{StoreError, StoreResult, ValidationError};
pub use memory::InMemoryOwner;
pub use owner::{FlatStore, FlatStoreOwner};
pub use validation::{ValidationReport, Validator};
