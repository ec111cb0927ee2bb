//! Lazy decoding iterators over a bound map.
//!
//! Both iterators borrow the map's snapshot and decode one entry per step.
//! Asking the map again yields a fresh iterator from the first key.

use std::collections::btree_map;

use jsonkv_codec::{DecodeResult, ValueCodec};
use serde_json::Value;

/// Decoded `(key, value)` pairs in key order.
pub struct Items<'m> {
    pub(crate) inner: btree_map::Iter<'m, String, String>,
    pub(crate) codec: &'m ValueCodec,
}

impl<'m> Iterator for Items<'m> {
    type Item = (&'m str, DecodeResult<Value>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, raw) = self.inner.next()?;
        Some((key.as_str(), self.codec.decode(raw)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Items<'_> {}

/// Decoded values in key order.
pub struct Values<'m> {
    pub(crate) inner: btree_map::Values<'m, String, String>,
    pub(crate) codec: &'m ValueCodec,
}

impl Iterator for Values<'_> {
    type Item = DecodeResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|raw| self.codec.decode(raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}
