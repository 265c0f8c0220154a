// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::fmt;
use std::iter::FromIterator;
use std::rc::Rc;

use crate::error::{Result, VectorError};
use crate::iter::Iter;
use crate::node::{capacity, get_physical, new_chain, set_physical, Node, BITS};

/// A persistent, immutable, indexed sequence.
///
/// `List` is backed by a radix-balanced trie of branching factor 32. Every
/// mutator consumes the list by value and returns a new one; the two share
/// every node they have in common. Cloning a `List` is `O(1)`: it copies the
/// handle, not the tree.
pub struct List<T> {
    pub(crate) root: Rc<Node<T>>,
    pub(crate) origin: usize,
    pub(crate) length: usize,
    pub(crate) shift: u32,
}

impl<T> Clone for List<T> {
    fn clone(&self) -> Self {
        List { root: Rc::clone(&self.root), origin: self.origin, length: self.length, shift: self.shift }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List { root: Rc::new(Node::empty_leaf()), origin: 0, length: 0, shift: 0 }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|(_, v)| v)).finish()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.iter().map(|(_, v)| v).eq(other.iter().map(|(_, v)| v))
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> List<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.length
    }

    /// True if the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Get the element at logical index `i`.
    pub fn get(&self, i: usize) -> Result<Rc<T>> {
        if i >= self.length {
            return Err(VectorError::IndexOutOfRange { index: i, length: self.length });
        }
        let p = self.origin + i;
        get_physical(&self.root, self.shift, p)
            .cloned()
            .ok_or(VectorError::IndexOutOfRange { index: i, length: self.length })
    }

    /// Return a new list with `i` mapped to `x`. `i == len()` is equivalent
    /// to [`List::append`].
    pub fn set(self, i: usize, x: T) -> Result<Self> {
        if i > self.length {
            return Err(VectorError::IndexOutOfRange { index: i, length: self.length });
        }
        if i == self.length {
            return Ok(self.append(x));
        }
        let p = self.origin + i;
        let new_root = set_physical(&self.root, self.shift, p, Rc::new(x));
        Ok(List { root: Rc::new(new_root), origin: self.origin, length: self.length, shift: self.shift })
    }

    /// Return a new list of length `len() + 1` with `x` at the end.
    pub fn append(self, x: T) -> Self {
        let p = self.origin + self.length;
        let value = Rc::new(x);
        if p < capacity(self.shift) {
            let new_root = set_physical(&self.root, self.shift, p, value);
            List { root: Rc::new(new_root), origin: self.origin, length: self.length + 1, shift: self.shift }
        } else {
            log::trace!("list: growing root upward on append, shift {} -> {}", self.shift, self.shift + BITS);
            let mut children = vec![None; crate::node::BRANCH];
            children[0] = Some(Rc::clone(&self.root));
            children[1] = Some(Rc::new(new_chain(self.shift, p, value)));
            List {
                root: Rc::new(Node::Branch(children)),
                origin: self.origin,
                length: self.length + 1,
                shift: self.shift + BITS,
            }
        }
    }

    /// Return a new list of length `len() + 1` with `x` at the start;
    /// existing elements shift from logical index `i` to `i + 1`.
    pub fn prepend(self, x: T) -> Self {
        let value = Rc::new(x);
        if self.origin > 0 {
            let new_origin = self.origin - 1;
            let new_root = set_physical(&self.root, self.shift, new_origin, value);
            return List { root: Rc::new(new_root), origin: new_origin, length: self.length + 1, shift: self.shift };
        }
        log::trace!("list: growing root downward on prepend, shift {} -> {}", self.shift, self.shift + BITS);
        let old_capacity = capacity(self.shift);
        let new_shift = self.shift + BITS;
        // Place the existing root in the tree's last slot and the new
        // element in a fresh chain in the second-to-last slot, at the
        // highest local address of that slot's subtree. This keeps the new
        // element's physical address immediately adjacent (one below) the
        // reused root's first physical address, so `p = origin + i` still
        // walks contiguously, and leaves slots 0..=29 free for further
        // prepends before the tree must grow again.
        let new_origin = 31 * old_capacity - 1;
        let mut children = vec![None; crate::node::BRANCH];
        children[31] = Some(Rc::clone(&self.root));
        children[30] = Some(Rc::new(new_chain(self.shift, new_origin, value)));
        List {
            root: Rc::new(Node::Branch(children)),
            origin: new_origin,
            length: self.length + 1,
            shift: new_shift,
        }
    }

    /// Return a new list covering logical positions `[lo, hi)`. Shares the
    /// same root as `self`; no interior nodes are copied or trimmed.
    pub fn slice(self, lo: usize, hi: usize) -> Result<Self> {
        if lo > hi || hi > self.length {
            return Err(VectorError::IndexOutOfRange { index: hi, length: self.length });
        }
        Ok(List { root: self.root, origin: self.origin + lo, length: hi - lo, shift: self.shift })
    }

    /// A forward iterator over `(index, value)` pairs.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self, true)
    }

    /// A backward iterator over `(index, value)` pairs, from `len() - 1`
    /// down to `0`.
    pub fn iter_rev(&self) -> Iter<'_, T> {
        Iter::new(self, false)
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        for item in iter {
            list = list.append(item);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = (usize, Rc<T>);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
