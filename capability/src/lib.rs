// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! Hashing and ordering capabilities consumed by the persistent collections:
//! a `Hasher` for `Map`, a `Comparer` for `SortedMap`, and the three
//! built-in adapters (integer, string, byte-sequence) required for both.

#![deny(missing_docs)]

mod builtin;
mod compare;
mod error;
mod hash;

pub use self::builtin::BuiltinKey;
pub use self::compare::{BytesComparer, Comparer, IntegerComparer, StringComparer};
pub use self::error::CapabilityError;
pub use self::hash::{BytesHasher, Hasher, IntegerHasher, StringHasher};

/// Resolve an optional hasher for a key domain that is not known at compile
/// time to have a built-in: `None` always fails with
/// [`CapabilityError::NoCapability`], since there is no way to pick a
/// default for an unconstrained `K`. Collections generic over a
/// [`BuiltinKey`] resolve `None` to that key's built-in hasher instead (see
/// `Map::new`/`Map::from_option`), and never need this fallback.
pub fn resolve_hasher<K: 'static>(
    hasher: Option<std::rc::Rc<dyn Hasher<K>>>,
) -> Result<std::rc::Rc<dyn Hasher<K>>, CapabilityError> {
    hasher.ok_or(CapabilityError::NoCapability)
}

/// Resolve an optional comparer for a key domain not known to have a
/// built-in. See [`resolve_hasher`].
pub fn resolve_comparer<K: 'static>(
    comparer: Option<std::rc::Rc<dyn Comparer<K>>>,
) -> Result<std::rc::Rc<dyn Comparer<K>>, CapabilityError> {
    comparer.ok_or(CapabilityError::NoCapability)
}
