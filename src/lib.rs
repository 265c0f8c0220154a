// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! Persistent immutable collections: [`List`], [`Map`], and [`SortedMap`].
//!
//! Every mutating operation returns a new collection that observes the
//! mutation while the input is left untouched, so independent holders may
//! read a collection concurrently without synchronization. This crate is a
//! thin facade over the three workspace members that carry the actual
//! trees: [`immutable_vector`] (a radix-balanced vector backing `List`),
//! [`immutable_hamt`] (a Hash-Array Mapped Trie backing `Map`), and
//! [`immutable_sortedmap`] (a copy-on-write B+tree backing `SortedMap`).
//! [`immutable_capability`] supplies the `Hasher`/`Comparer` traits the maps
//! are generic over.

#![deny(missing_docs)]

pub use immutable_capability::{
    BuiltinKey, BytesComparer, BytesHasher, CapabilityError, Comparer, Hasher, IntegerComparer, IntegerHasher,
    StringComparer, StringHasher,
};
pub use immutable_hamt::{HamtError, Map};
pub use immutable_sortedmap::{SortedMap, SortedMapError};
pub use immutable_vector::{List, VectorError};

/// Iterator types for the three collections, re-exported under one name
/// each so a caller can name them without depending on the workspace
/// members directly.
pub mod iter {
    pub use immutable_hamt::Iter as MapIter;
    pub use immutable_sortedmap::Iter as SortedMapIter;
    pub use immutable_vector::Iter as ListIter;
}
