// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

use immutable_capability::{resolve_comparer, BuiltinKey, Comparer};

use crate::error::Result;
use crate::iter::Iter;
use crate::node::{self, InsertResult, Node, DEFAULT_M};

/// A persistent, immutable, ordered associative mapping.
///
/// `SortedMap` is backed by a copy-on-write B+tree of branching factor 32.
/// Every mutator consumes the map by value and returns a new one; the two
/// share every node they have in common. Cloning a `SortedMap` is `O(1)`: it
/// copies the handle, not the tree. Unlike [`immutable_hamt::Map`], two
/// `SortedMap`s holding the same keys always iterate identically, regardless
/// of insertion order.
pub struct SortedMap<K, V> {
    root: Rc<Node<K, V>>,
    length: usize,
    cmp: Rc<dyn Comparer<K>>,
    branching_factor: usize,
}

impl<K, V> Clone for SortedMap<K, V> {
    fn clone(&self) -> Self {
        SortedMap {
            root: Rc::clone(&self.root),
            length: self.length,
            cmp: Rc::clone(&self.cmp),
            branching_factor: self.branching_factor,
        }
    }
}

impl<K: fmt::Debug + 'static, V: fmt::Debug> fmt::Debug for SortedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: 'static, V: PartialEq> PartialEq for SortedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().map(|(_, v)| v).eq(other.iter().map(|(_, v)| v))
    }
}

impl<K: 'static, V: Eq> Eq for SortedMap<K, V> {}

impl<K: 'static, V> SortedMap<K, V> {
    /// Construct an empty sorted map using an explicit ordering capability,
    /// with the default branching factor (32).
    pub fn with_comparer(cmp: Rc<dyn Comparer<K>>) -> Self {
        Self::with_comparer_and_branching_factor(cmp, DEFAULT_M)
    }

    /// Construct an empty sorted map using an explicit ordering capability
    /// and an explicit B+tree branching factor. `m` must be at least 3; it
    /// governs both the maximum entries per leaf and the maximum children
    /// per internal node.
    pub fn with_comparer_and_branching_factor(cmp: Rc<dyn Comparer<K>>, m: usize) -> Self {
        assert!(m >= 3, "branching factor must be at least 3");
        SortedMap { root: Rc::new(Node::empty()), length: 0, cmp, branching_factor: m }
    }

    /// Construct an empty sorted map, resolving `cmp` against the capability
    /// contract: `None` fails with [`crate::SortedMapError::NoCapability`]
    /// unless `K` has a built-in (see [`SortedMap::new`]/
    /// [`SortedMap::from_option`] for key domains that do).
    pub fn try_with_comparer(cmp: Option<Rc<dyn Comparer<K>>>) -> Result<Self> {
        Ok(Self::with_comparer(resolve_comparer(cmp)?))
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
        node::get(&self.root, key, &*self.cmp)
    }

    /// True if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Return a new map with `key` mapped to `value`, overwriting any prior
    /// value. Length grows by one only if `key` was absent.
    pub fn set(self, key: K, value: V) -> Self {
        let (result, grew) =
            node::insert(&self.root, Rc::new(key), Rc::new(value), &*self.cmp, self.branching_factor);
        let new_root = match result {
            InsertResult::Single(root) => root,
            InsertResult::Split(left, sep, right) => Rc::new(Node::Internal(vec![sep], vec![left, right])),
        };
        SortedMap {
            root: new_root,
            length: if grew { self.length + 1 } else { self.length },
            cmp: self.cmp,
            branching_factor: self.branching_factor,
        }
    }

    /// Return a new map with `key` removed. If `key` is absent, returns a map
    /// observationally identical to `self` without touching the tree.
    pub fn delete(self, key: &K) -> Self {
        match node::delete(&self.root, key, &*self.cmp, self.branching_factor) {
            None => self,
            Some(new_root) => SortedMap {
                root: node::shrink_root(new_root),
                length: self.length - 1,
                cmp: self.cmp,
                branching_factor: self.branching_factor,
            },
        }
    }

    /// A forward iterator over `(key, value)` pairs in ascending
    /// [`Comparer`] order.
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(Rc::clone(&self.root), Rc::clone(&self.cmp), true)
    }

    /// A backward iterator over `(key, value)` pairs in descending
    /// [`Comparer`] order.
    pub fn iter_rev(&self) -> Iter<K, V> {
        Iter::new(Rc::clone(&self.root), Rc::clone(&self.cmp), false)
    }
}

impl<K: BuiltinKey, V> SortedMap<K, V> {
    /// Construct an empty sorted map using `K`'s built-in [`Comparer`].
    pub fn new() -> Self {
        Self::with_comparer(K::builtin_comparer())
    }

    /// Construct an empty sorted map using `K`'s built-in [`Comparer`] and an
    /// explicit B+tree branching factor (the default is 32).
    pub fn new_with_branching_factor(m: usize) -> Self {
        Self::with_comparer_and_branching_factor(K::builtin_comparer(), m)
    }

    /// Construct an empty sorted map, resolving `None` to `K`'s built-in
    /// comparer instead of failing, since `K` is known to have one.
    pub fn from_option(cmp: Option<Rc<dyn Comparer<K>>>) -> Self {
        Self::with_comparer(cmp.unwrap_or_else(K::builtin_comparer))
    }
}

impl<K: BuiltinKey, V> Default for SortedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: BuiltinKey, V> FromIterator<(K, V)> for SortedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SortedMap::new();
        for (k, v) in iter {
            map = map.set(k, v);
        }
        map
    }
}

impl<'a, K: 'static, V> IntoIterator for &'a SortedMap<K, V> {
    type Item = (Rc<K>, Rc<V>);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
