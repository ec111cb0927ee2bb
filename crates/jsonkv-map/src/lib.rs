//! Self-serializing map for JSONKV.
//!
//! A host stores typed values in a flat store that only accepts strings.
//! [`SelfSerializingMap`] is the map-like view the host hands out: values are
//! encoded on write and decoded on read, and because a returned view has no
//! other way to signal changes back to its owner, every mutation replaces
//! the owner's whole flat store immediately.
//!
//! # Modules
//!
//! - [`map`] — [`SelfSerializingMap`]
//! - [`iter`] — lazy decoding iterators [`Items`] and [`Values`]
//! - [`error`] — [`MapError`]

pub mod error;
pub mod iter;
pub mod map;

pub use error::{MapError, MapResult};
pub use iter::{Items, Values};
pub use map::SelfSerializingMap;
