// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

use immutable_capability::{resolve_hasher, BuiltinKey, Hasher};

use crate::error::Result;
use crate::iter::Iter;
use crate::node::{self, Deleted, Node};

/// A persistent, immutable, unordered associative mapping.
///
/// `Map` is backed by a Hash-Array Mapped Trie. Every mutator consumes the
/// map by value and returns a new one; the two share every node they have in
/// common. Cloning a `Map` is `O(1)`: it copies the handle, not the trie.
///
/// Iteration order is deterministic for a given trie shape but is **not** a
/// function of the key set alone: two maps holding the same keys built from
/// different insertion sequences may iterate in different orders if any of
/// their keys' hashes collide.
pub struct Map<K, V> {
    root: Rc<Node<K, V>>,
    length: usize,
    hasher: Rc<dyn Hasher<K>>,
}

impl<K, V> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        Map { root: Rc::clone(&self.root), length: self.length, hasher: Rc::clone(&self.hasher) }
    }
}

impl<K: fmt::Debug + 'static, V: fmt::Debug> fmt::Debug for Map<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v)| (k, v))).finish()
    }
}

impl<K: 'static, V: PartialEq> PartialEq for Map<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().all(|(k, v)| other.get(&k).map_or(false, |ov| *ov == *v))
    }
}

impl<K: 'static, V: Eq> Eq for Map<K, V> {}

impl<K: 'static, V> Map<K, V> {
    /// Construct an empty map using an explicit hashing capability.
    pub fn with_hasher(hasher: Rc<dyn Hasher<K>>) -> Self {
        Map { root: Rc::new(Node::empty()), length: 0, hasher }
    }

    /// Construct an empty map, resolving `hasher` against the capability
    /// contract: `None` fails with [`crate::HamtError::NoCapability`] unless
    /// `K` has a built-in (see [`Map::new`]/[`Map::from_option`] for key
    /// domains that do).
    pub fn try_with_hasher(hasher: Option<Rc<dyn Hasher<K>>>) -> Result<Self> {
        Ok(Self::with_hasher(resolve_hasher(hasher)?))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.length
    }

    /// True if the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Look up `key`. Returns `None` when absent.
    pub fn get(&self, key: &K) -> Option<Rc<V>> {
        let hash = self.hasher.hash(key);
        node::get(&self.root, 0, hash, key, &*self.hasher)
    }

    /// True if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Return a new map with `key` mapped to `value`, overwriting any prior
    /// value. Length grows by one only if `key` was absent.
    pub fn set(self, key: K, value: V) -> Self {
        let hash = self.hasher.hash(&key);
        let (new_root, grew) = node::insert(&self.root, 0, hash, Rc::new(key), Rc::new(value), &*self.hasher);
        Map { root: new_root, length: if grew { self.length + 1 } else { self.length }, hasher: self.hasher }
    }

    /// Return a new map with `key` removed. If `key` is absent, returns a map
    /// observationally identical to `self` without touching the trie.
    pub fn delete(self, key: &K) -> Self {
        let hash = self.hasher.hash(key);
        match node::delete(&self.root, 0, hash, key, &*self.hasher) {
            Deleted::Absent => self,
            Deleted::Removed(None) => Map { root: Rc::new(Node::empty()), length: self.length - 1, hasher: self.hasher },
            Deleted::Removed(Some(new_root)) => Map { root: new_root, length: self.length - 1, hasher: self.hasher },
        }
    }

    /// A deterministic traversal of `(key, value)` pairs derived from the
    /// trie's structure, not the insertion order.
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(&self.root)
    }
}

impl<K: BuiltinKey, V> Map<K, V> {
    /// Construct an empty map using `K`'s built-in [`Hasher`].
    pub fn new() -> Self {
        Self::with_hasher(K::builtin_hasher())
    }

    /// Construct an empty map, resolving `None` to `K`'s built-in hasher
    /// instead of failing, since `K` is known to have one.
    pub fn from_option(hasher: Option<Rc<dyn Hasher<K>>>) -> Self {
        Self::with_hasher(hasher.unwrap_or_else(K::builtin_hasher))
    }
}

impl<K: BuiltinKey, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: BuiltinKey, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map = map.set(k, v);
        }
        map
    }
}

impl<'a, K: 'static, V> IntoIterator for &'a Map<K, V> {
    type Item = (Rc<K>, Rc<V>);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
