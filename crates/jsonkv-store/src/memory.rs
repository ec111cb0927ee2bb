//! In-memory owner for testing and embedding.
//!
//! [`InMemoryOwner`] holds any number of named flat-store fields in a
//! `BTreeMap` and counts how many times a field has been replaced, which
//! makes write-through behavior observable in tests.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::owner::{FlatStore, FlatStoreOwner};

/// An in-memory implementation of [`FlatStoreOwner`].
///
/// Fields must be declared before they can be replaced; a host does not grow
/// new attributes because the map writes to them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryOwner {
    fields: BTreeMap<String, FlatStore>,
    replacements: u64,
}

impl InMemoryOwner {
    /// Create an owner with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `field` holding `store`.
    pub fn with_field(mut self, field: impl Into<String>, store: FlatStore) -> Self {
        self.fields.insert(field.into(), store);
        self
    }

    /// Declare `field` holding an empty store.
    pub fn with_empty_field(self, field: impl Into<String>) -> Self {
        self.with_field(field, FlatStore::new())
    }

    /// Number of full replacements performed so far, across all fields.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Names of all declared fields, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}

impl FlatStoreOwner for InMemoryOwner {
    fn read_field(&self, field: &str) -> Option<&FlatStore> {
        self.fields.get(field)
    }

    fn replace_field(&mut self, field: &str, store: FlatStore) -> StoreResult<()> {
        let slot = self
            .fields
            .get_mut(field)
            .ok_or_else(|| StoreError::UnknownField {
                field: field.to_string(),
            })?;
        *slot = store;
        self.replacements += 1;
        debug!(field, replacements = self.replacements, "in-memory field replaced");
        Ok(())
    }
}
