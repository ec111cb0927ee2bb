//! The [`FlatStoreOwner`] trait: the contract between a host and the map.
//!
//! Any host (a database model, a config record, an in-memory fixture)
//! implements this trait to expose one or more flat-store attributes. The
//! core never mutates a host's flat store in place; it only reads it and
//! replaces it whole.

use std::collections::BTreeMap;

use crate::error::StoreResult;

/// String keys to stored JSON text. Ordered by key.
pub type FlatStore = BTreeMap<String, String>;

/// A host object holding flat stores in named attributes.
///
/// Implementations persist nothing themselves as far as this crate is
/// concerned; saving the host is the caller's business.
pub trait FlatStoreOwner {
    /// Read the current flat store held in `field`.
    ///
    /// Returns `None` if the owner has no such attribute.
    fn read_field(&self, field: &str) -> Option<&FlatStore>;

    /// Replace the flat store held in `field` in full.
    ///
    /// Fails with [`StoreError::UnknownField`](crate::StoreError::UnknownField)
    /// if the owner has no such attribute.
    fn replace_field(&mut self, field: &str, store: FlatStore) -> StoreResult<()>;

    /// Returns `true` if the owner exposes `field`.
    fn has_field(&self, field: &str) -> bool {
        self.read_field(field).is_some()
    }
}
