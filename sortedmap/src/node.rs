// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::cmp::Ordering;
use std::rc::Rc;

use immutable_capability::Comparer;

/// Default branching factor: a leaf holds at most this many key/value pairs;
/// an internal node holds at most `m - 1` separators and `m` children.
/// [`crate::SortedMap::new_with_branching_factor`] can override it per map.
pub(crate) const DEFAULT_M: usize = 32;

/// Minimum occupancy for any non-root node at branching factor `m`, leaf or
/// internal (in children, for an internal node; in entries, for a leaf).
fn min_occupancy(m: usize) -> usize {
    (m + 1) / 2
}

/// A node of the B+tree. Internal nodes route on separator keys; leaves hold
/// the (key, value) domain. `seps.len() + 1 == children.len()` always holds
/// for an `Internal` node.
pub(crate) enum Node<K, V> {
    Internal(Vec<Rc<K>>, Vec<Rc<Node<K, V>>>),
    Leaf(Vec<(Rc<K>, Rc<V>)>),
}

impl<K, V> Node<K, V> {
    pub(crate) fn empty() -> Self {
        Node::Leaf(Vec::new())
    }
}

pub(crate) fn occupancy<K, V>(node: &Node<K, V>) -> usize {
    match node {
        Node::Leaf(entries) => entries.len(),
        Node::Internal(_, children) => children.len(),
    }
}

fn is_underflow<K, V>(node: &Node<K, V>, m: usize) -> bool {
    occupancy(node) < min_occupancy(m)
}

/// First index `i` such that `seps[i] > key`, i.e. the index of the child
/// that would contain `key` (`seps.len()` if `key` exceeds every separator).
pub(crate) fn child_index<K>(seps: &[Rc<K>], key: &K, cmp: &dyn Comparer<K>) -> usize {
    let mut lo = 0usize;
    let mut hi = seps.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if cmp.compare(&seps[mid], key) == Ordering::Greater {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

pub(crate) fn get<K, V>(node: &Node<K, V>, key: &K, cmp: &dyn Comparer<K>) -> Option<Rc<V>> {
    match node {
        Node::Leaf(entries) => entries.binary_search_by(|(k, _)| cmp.compare(k, key)).ok().map(|i| Rc::clone(&entries[i].1)),
        Node::Internal(seps, children) => {
            let idx = child_index(seps, key, cmp);
            get(&children[idx], key, cmp)
        }
    }
}

/// Outcome of inserting into a subtree: either the subtree was replaced
/// whole, or it grew past capacity and split into two siblings joined by a
/// separator that the caller must insert into its own node.
pub(crate) enum InsertResult<K, V> {
    Single(Rc<Node<K, V>>),
    Split(Rc<Node<K, V>>, Rc<K>, Rc<Node<K, V>>),
}

/// Insert or overwrite `(key, value)` below `node`. Returns the replacement
/// (or split) plus whether the key was previously absent (length grew).
pub(crate) fn insert<K, V>(node: &Node<K, V>, key: Rc<K>, value: Rc<V>, cmp: &dyn Comparer<K>, m: usize) -> (InsertResult<K, V>, bool) {
    match node {
        Node::Leaf(entries) => match entries.binary_search_by(|(k, _)| cmp.compare(k, &key)) {
            Ok(i) => {
                let mut new_entries = entries.clone();
                new_entries[i] = (key, value);
                (InsertResult::Single(Rc::new(Node::Leaf(new_entries))), false)
            }
            Err(i) => {
                let mut new_entries = entries.clone();
                new_entries.insert(i, (key, value));
                if new_entries.len() > m {
                    log::trace!("sortedmap: leaf split, {} entries", new_entries.len());
                    let mid = new_entries.len() / 2;
                    let right_entries = new_entries.split_off(mid);
                    let sep = Rc::clone(&right_entries[0].0);
                    let left = Rc::new(Node::Leaf(new_entries));
                    let right = Rc::new(Node::Leaf(right_entries));
                    (InsertResult::Split(left, sep, right), true)
                } else {
                    (InsertResult::Single(Rc::new(Node::Leaf(new_entries))), true)
                }
            }
        },
        Node::Internal(seps, children) => {
            let idx = child_index(seps, &key, cmp);
            let (child_result, grew) = insert(&children[idx], key, value, cmp, m);
            match child_result {
                InsertResult::Single(new_child) => {
                    let mut new_children = children.clone();
                    new_children[idx] = new_child;
                    (InsertResult::Single(Rc::new(Node::Internal(seps.clone(), new_children))), grew)
                }
                InsertResult::Split(left, sep, right) => {
                    let mut new_children = children.clone();
                    new_children[idx] = left;
                    new_children.insert(idx + 1, right);
                    let mut new_seps = seps.clone();
                    new_seps.insert(idx, sep);
                    if new_seps.len() > m - 1 {
                        log::trace!("sortedmap: internal split, {} separators", new_seps.len());
                        let mid = new_seps.len() / 2;
                        let right_children = new_children.split_off(mid + 1);
                        let right_seps = new_seps.split_off(mid + 1);
                        let up_sep = new_seps.pop().expect("mid index populated before split_off");
                        let left_node = Rc::new(Node::Internal(new_seps, new_children));
                        let right_node = Rc::new(Node::Internal(right_seps, right_children));
                        (InsertResult::Split(left_node, up_sep, right_node), grew)
                    } else {
                        (InsertResult::Single(Rc::new(Node::Internal(new_seps, new_children))), grew)
                    }
                }
            }
        }
    }
}

fn borrow_from_left<K, V>(
    seps: &[Rc<K>],
    children: &[Rc<Node<K, V>>],
    idx: usize,
    new_child: Rc<Node<K, V>>,
) -> (Vec<Rc<K>>, Vec<Rc<Node<K, V>>>) {
    let left = &children[idx - 1];
    let mut new_seps = seps.to_vec();
    let mut new_children = children.to_vec();
    match (&**left, &*new_child) {
        (Node::Leaf(left_entries), Node::Leaf(child_entries)) => {
            let mut left_entries = left_entries.clone();
            let borrowed = left_entries.pop().expect("left sibling has more than MIN entries");
            let mut child_entries = child_entries.clone();
            child_entries.insert(0, borrowed);
            new_seps[idx - 1] = Rc::clone(&child_entries[0].0);
            new_children[idx - 1] = Rc::new(Node::Leaf(left_entries));
            new_children[idx] = Rc::new(Node::Leaf(child_entries));
        }
        (Node::Internal(left_seps, left_kids), Node::Internal(child_seps, child_kids)) => {
            let mut left_seps = left_seps.clone();
            let mut left_kids = left_kids.clone();
            let borrowed_sep = left_seps.pop().expect("left sibling has more than MIN children");
            let borrowed_child = left_kids.pop().expect("left sibling has more than MIN children");
            let mut child_seps = child_seps.clone();
            let mut child_kids = child_kids.clone();
            child_seps.insert(0, Rc::clone(&seps[idx - 1]));
            child_kids.insert(0, borrowed_child);
            new_seps[idx - 1] = borrowed_sep;
            new_children[idx - 1] = Rc::new(Node::Internal(left_seps, left_kids));
            new_children[idx] = Rc::new(Node::Internal(child_seps, child_kids));
        }
        _ => unreachable!("siblings at the same tree level share a node variant"),
    }
    (new_seps, new_children)
}

fn borrow_from_right<K, V>(
    seps: &[Rc<K>],
    children: &[Rc<Node<K, V>>],
    idx: usize,
    new_child: Rc<Node<K, V>>,
) -> (Vec<Rc<K>>, Vec<Rc<Node<K, V>>>) {
    let right = &children[idx + 1];
    let mut new_seps = seps.to_vec();
    let mut new_children = children.to_vec();
    match (&*new_child, &**right) {
        (Node::Leaf(child_entries), Node::Leaf(right_entries)) => {
            let mut right_entries = right_entries.clone();
            let borrowed = right_entries.remove(0);
            let mut child_entries = child_entries.clone();
            child_entries.push(borrowed);
            new_seps[idx] = Rc::clone(&right_entries[0].0);
            new_children[idx] = Rc::new(Node::Leaf(child_entries));
            new_children[idx + 1] = Rc::new(Node::Leaf(right_entries));
        }
        (Node::Internal(child_seps, child_kids), Node::Internal(right_seps, right_kids)) => {
            let mut right_seps = right_seps.clone();
            let mut right_kids = right_kids.clone();
            let borrowed_sep = right_seps.remove(0);
            let borrowed_child = right_kids.remove(0);
            let mut child_seps = child_seps.clone();
            let mut child_kids = child_kids.clone();
            child_seps.push(Rc::clone(&seps[idx]));
            child_kids.push(borrowed_child);
            new_seps[idx] = borrowed_sep;
            new_children[idx] = Rc::new(Node::Internal(child_seps, child_kids));
            new_children[idx + 1] = Rc::new(Node::Internal(right_seps, right_kids));
        }
        _ => unreachable!("siblings at the same tree level share a node variant"),
    }
    (new_seps, new_children)
}

fn merge_with_left<K, V>(
    seps: &[Rc<K>],
    children: &[Rc<Node<K, V>>],
    idx: usize,
    new_child: Rc<Node<K, V>>,
) -> (Vec<Rc<K>>, Vec<Rc<Node<K, V>>>) {
    let left = &children[idx - 1];
    let merged = match (&**left, &*new_child) {
        (Node::Leaf(left_entries), Node::Leaf(child_entries)) => {
            let mut merged_entries = left_entries.clone();
            merged_entries.extend(child_entries.iter().cloned());
            Node::Leaf(merged_entries)
        }
        (Node::Internal(left_seps, left_kids), Node::Internal(child_seps, child_kids)) => {
            let mut merged_seps = left_seps.clone();
            merged_seps.push(Rc::clone(&seps[idx - 1]));
            merged_seps.extend(child_seps.iter().cloned());
            let mut merged_kids = left_kids.clone();
            merged_kids.extend(child_kids.iter().cloned());
            Node::Internal(merged_seps, merged_kids)
        }
        _ => unreachable!("siblings at the same tree level share a node variant"),
    };
    let mut new_seps = seps.to_vec();
    let mut new_children = children.to_vec();
    new_seps.remove(idx - 1);
    new_children.remove(idx);
    new_children[idx - 1] = Rc::new(merged);
    (new_seps, new_children)
}

fn merge_with_right<K, V>(
    seps: &[Rc<K>],
    children: &[Rc<Node<K, V>>],
    idx: usize,
    new_child: Rc<Node<K, V>>,
) -> (Vec<Rc<K>>, Vec<Rc<Node<K, V>>>) {
    let right = &children[idx + 1];
    let merged = match (&*new_child, &**right) {
        (Node::Leaf(child_entries), Node::Leaf(right_entries)) => {
            let mut merged_entries = child_entries.clone();
            merged_entries.extend(right_entries.iter().cloned());
            Node::Leaf(merged_entries)
        }
        (Node::Internal(child_seps, child_kids), Node::Internal(right_seps, right_kids)) => {
            let mut merged_seps = child_seps.clone();
            merged_seps.push(Rc::clone(&seps[idx]));
            merged_seps.extend(right_seps.iter().cloned());
            let mut merged_kids = child_kids.clone();
            merged_kids.extend(right_kids.iter().cloned());
            Node::Internal(merged_seps, merged_kids)
        }
        _ => unreachable!("siblings at the same tree level share a node variant"),
    };
    let mut new_seps = seps.to_vec();
    let mut new_children = children.to_vec();
    new_seps.remove(idx);
    new_children.remove(idx + 1);
    new_children[idx] = Rc::new(merged);
    (new_seps, new_children)
}

/// Rebalance `children[idx]` (already replaced by `new_child`) against its
/// siblings if it underflowed: borrow a single entry/child from whichever
/// neighbor has spare occupancy, or merge with a neighbor otherwise. A
/// one-child internal node (possible only at the root, mid-recursion) is
/// passed through unchanged; [`delete`]'s caller collapses it.
fn rebalance<K, V>(
    seps: &[Rc<K>],
    children: &[Rc<Node<K, V>>],
    idx: usize,
    new_child: Rc<Node<K, V>>,
    m: usize,
) -> (Vec<Rc<K>>, Vec<Rc<Node<K, V>>>) {
    if !is_underflow(&new_child, m) || children.len() == 1 {
        let mut new_children = children.to_vec();
        new_children[idx] = new_child;
        return (seps.to_vec(), new_children);
    }
    let min = min_occupancy(m);
    if idx > 0 && occupancy(&children[idx - 1]) > min {
        return borrow_from_left(seps, children, idx, new_child);
    }
    if idx + 1 < children.len() && occupancy(&children[idx + 1]) > min {
        return borrow_from_right(seps, children, idx, new_child);
    }
    if idx > 0 {
        merge_with_left(seps, children, idx, new_child)
    } else {
        merge_with_right(seps, children, idx, new_child)
    }
}

/// Delete `key` below `node`. Returns `None` if absent. The returned node
/// may itself underflow if it is the root; [`crate::map::SortedMap::delete`]
/// collapses a root left with a single child.
pub(crate) fn delete<K, V>(node: &Rc<Node<K, V>>, key: &K, cmp: &dyn Comparer<K>, m: usize) -> Option<Rc<Node<K, V>>> {
    match &**node {
        Node::Leaf(entries) => {
            let i = entries.binary_search_by(|(k, _)| cmp.compare(k, key)).ok()?;
            let mut new_entries = entries.clone();
            new_entries.remove(i);
            Some(Rc::new(Node::Leaf(new_entries)))
        }
        Node::Internal(seps, children) => {
            let idx = child_index(seps, key, cmp);
            let new_child = delete(&children[idx], key, cmp, m)?;
            let (new_seps, new_children) = rebalance(seps, children, idx, new_child, m);
            Some(Rc::new(Node::Internal(new_seps, new_children)))
        }
    }
}

/// Collapse a root left with exactly one child (and no separators) down to
/// that child, repeatedly. Only the root is exempt from minimum occupancy,
/// so this is the only place height can shrink.
pub(crate) fn shrink_root<K, V>(mut root: Rc<Node<K, V>>) -> Rc<Node<K, V>> {
    loop {
        let next = match &*root {
            Node::Internal(seps, children) if seps.is_empty() && children.len() == 1 => Some(Rc::clone(&children[0])),
            _ => None,
        };
        match next {
            Some(child) => root = child,
            None => return root,
        }
    }
}
