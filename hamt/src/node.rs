// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::rc::Rc;

use immutable_capability::Hasher;

/// Hash/index bits consumed per trie level.
pub(crate) const BITS: u32 = 5;
/// A bitmap node whose compact array reaches this many live entries is
/// promoted to an array node on the next insert that touches it.
pub(crate) const ARRAY_PROMOTE_AT: usize = 16;
/// An array node whose occupancy drops below this on delete is demoted back
/// to a bitmap node.
pub(crate) const ARRAY_DEMOTE_BELOW: usize = 16;
/// Number of levels of 5-bit indices consumed (30 of the 32 hash bits)
/// before falling back to a collision node.
pub(crate) const COLLISION_LEVEL: usize = 6;

/// A node of the HAMT. `Leaf` and `Collision` are the terminal cases;
/// `Bitmap` and `Array` are interior cases that route on `(hash >> 5*level)
/// & 31`. `Bitmap` entries and `Array` slots both hold `Rc<Node>`, which may
/// itself be a `Leaf` — there is no separate "inline leaf vs. sub-node"
/// representation, since a `Leaf` is just a node with no children.
pub(crate) enum Node<K, V> {
    Bitmap(u32, Vec<Rc<Node<K, V>>>),
    Array(Vec<Option<Rc<Node<K, V>>>>),
    Collision(u32, Vec<(Rc<K>, Rc<V>)>),
    Leaf(u32, Rc<K>, Rc<V>),
}

impl<K, V> Node<K, V> {
    pub(crate) fn empty() -> Self {
        Node::Bitmap(0, Vec::new())
    }
}

fn level_index(hash: u32, level: usize) -> usize {
    ((hash >> (BITS as usize * level)) & 0x1f) as usize
}

fn promote_to_array<K, V>(bitmap: u32, entries: &[Rc<Node<K, V>>]) -> Node<K, V> {
    let mut children: Vec<Option<Rc<Node<K, V>>>> = vec![None; 32];
    let mut compact = 0;
    for bit in 0..32 {
        if bitmap & (1 << bit) != 0 {
            children[bit] = Some(Rc::clone(&entries[compact]));
            compact += 1;
        }
    }
    Node::Array(children)
}

fn demote_to_bitmap<K, V>(children: &[Option<Rc<Node<K, V>>>]) -> Node<K, V> {
    let mut bitmap = 0u32;
    let mut entries = Vec::new();
    for (bit, child) in children.iter().enumerate() {
        if let Some(child) = child {
            bitmap |= 1 << bit;
            entries.push(Rc::clone(child));
        }
    }
    Node::Bitmap(bitmap, entries)
}

/// Look up `key` below `node`, given its already-computed `hash` and the
/// current trie `level`.
pub(crate) fn get<K, V>(node: &Node<K, V>, level: usize, hash: u32, key: &K, hasher: &dyn Hasher<K>) -> Option<Rc<V>> {
    match node {
        Node::Leaf(lhash, lkey, value) => {
            if *lhash == hash && hasher.eq(lkey, key) {
                Some(Rc::clone(value))
            } else {
                None
            }
        }
        Node::Collision(_, pairs) => pairs.iter().find(|(k, _)| hasher.eq(k, key)).map(|(_, v)| Rc::clone(v)),
        Node::Bitmap(bitmap, entries) => {
            let idx = level_index(hash, level);
            let mask = 1u32 << idx;
            if bitmap & mask == 0 {
                return None;
            }
            let compact = (bitmap & (mask - 1)).count_ones() as usize;
            get(&entries[compact], level + 1, hash, key, hasher)
        }
        Node::Array(children) => {
            let idx = level_index(hash, level);
            children[idx].as_deref().and_then(|child| get(child, level + 1, hash, key, hasher))
        }
    }
}

/// Merge a fresh `(hash, key, value)` leaf into an empty subtree rooted at
/// `level`, used to build the branch between two leaves that shared a slot.
fn seed_leaf<K, V>(level: usize, hash: u32, key: Rc<K>, value: Rc<V>, hasher: &dyn Hasher<K>) -> Rc<Node<K, V>> {
    let empty = Rc::new(Node::empty());
    insert(&empty, level, hash, key, value, hasher).0
}

/// Insert or overwrite `(key, value)` below `node`. Returns the replacement
/// node and whether the key was previously absent (length grew).
pub(crate) fn insert<K, V>(
    node: &Rc<Node<K, V>>,
    level: usize,
    hash: u32,
    key: Rc<K>,
    value: Rc<V>,
    hasher: &dyn Hasher<K>,
) -> (Rc<Node<K, V>>, bool) {
    match &**node {
        Node::Leaf(lhash, lkey, lvalue) => {
            if *lhash == hash && hasher.eq(lkey, &key) {
                (Rc::new(Node::Leaf(hash, key, value)), false)
            } else if level >= COLLISION_LEVEL {
                let pairs = vec![(Rc::clone(lkey), Rc::clone(lvalue)), (key, value)];
                (Rc::new(Node::Collision(hash, pairs)), true)
            } else {
                log::trace!("hamt: leaf/leaf split at level {}", level);
                let existing = seed_leaf(level, *lhash, Rc::clone(lkey), Rc::clone(lvalue), hasher);
                (insert(&existing, level, hash, key, value, hasher).0, true)
            }
        }
        Node::Collision(chash, pairs) => {
            match pairs.iter().position(|(k, _)| hasher.eq(k, &key)) {
                Some(pos) => {
                    let mut new_pairs = pairs.clone();
                    new_pairs[pos] = (key, value);
                    (Rc::new(Node::Collision(*chash, new_pairs)), false)
                }
                None => {
                    let mut new_pairs = pairs.clone();
                    new_pairs.push((key, value));
                    (Rc::new(Node::Collision(*chash, new_pairs)), true)
                }
            }
        }
        Node::Bitmap(bitmap, entries) => {
            let idx = level_index(hash, level);
            let mask = 1u32 << idx;
            let compact = (bitmap & (mask - 1)).count_ones() as usize;
            if bitmap & mask == 0 {
                let mut new_entries = entries.clone();
                new_entries.insert(compact, Rc::new(Node::Leaf(hash, key, value)));
                let new_bitmap = bitmap | mask;
                if new_entries.len() >= ARRAY_PROMOTE_AT {
                    log::debug!("hamt: promoting bitmap node to array node at level {}", level);
                    (Rc::new(promote_to_array(new_bitmap, &new_entries)), true)
                } else {
                    (Rc::new(Node::Bitmap(new_bitmap, new_entries)), true)
                }
            } else {
                let (new_child, grew) = insert(&entries[compact], level + 1, hash, key, value, hasher);
                let mut new_entries = entries.clone();
                new_entries[compact] = new_child;
                (Rc::new(Node::Bitmap(*bitmap, new_entries)), grew)
            }
        }
        Node::Array(children) => {
            let idx = level_index(hash, level);
            match &children[idx] {
                Some(child) => {
                    let (new_child, grew) = insert(child, level + 1, hash, key, value, hasher);
                    let mut new_children = children.clone();
                    new_children[idx] = Some(new_child);
                    (Rc::new(Node::Array(new_children)), grew)
                }
                None => {
                    let mut new_children = children.clone();
                    new_children[idx] = Some(Rc::new(Node::Leaf(hash, key, value)));
                    (Rc::new(Node::Array(new_children)), true)
                }
            }
        }
    }
}

/// Outcome of descending to delete a key below some node.
pub(crate) enum Deleted<K, V> {
    /// The key was not present; nothing changed.
    Absent,
    /// The key was removed. `None` means the node is now entirely empty and
    /// its slot in the parent should be cleared; `Some` is the replacement.
    Removed(Option<Rc<Node<K, V>>>),
}

fn compact_after_removal<K, V>(bitmap: u32, mut entries: Vec<Rc<Node<K, V>>>, idx: usize) -> Deleted<K, V> {
    entries.remove(idx);
    if entries.is_empty() {
        Deleted::Removed(None)
    } else if entries.len() == 1 {
        match &*entries[0] {
            Node::Leaf(..) => Deleted::Removed(Some(Rc::clone(&entries[0]))),
            _ => Deleted::Removed(Some(Rc::new(Node::Bitmap(bitmap, entries)))),
        }
    } else {
        Deleted::Removed(Some(Rc::new(Node::Bitmap(bitmap, entries))))
    }
}

fn compact_array_after_removal<K, V>(mut children: Vec<Option<Rc<Node<K, V>>>>, idx: usize) -> Deleted<K, V> {
    children[idx] = None;
    let occupancy = children.iter().filter(|c| c.is_some()).count();
    if occupancy == 0 {
        Deleted::Removed(None)
    } else if occupancy < ARRAY_DEMOTE_BELOW {
        Deleted::Removed(Some(Rc::new(demote_to_bitmap(&children))))
    } else {
        Deleted::Removed(Some(Rc::new(Node::Array(children))))
    }
}

/// Delete `key` below `node`. See [`Deleted`] for how the result threads
/// back up through the recursion.
pub(crate) fn delete<K, V>(node: &Rc<Node<K, V>>, level: usize, hash: u32, key: &K, hasher: &dyn Hasher<K>) -> Deleted<K, V> {
    match &**node {
        Node::Leaf(lhash, lkey, _) => {
            if *lhash == hash && hasher.eq(lkey, key) {
                Deleted::Removed(None)
            } else {
                Deleted::Absent
            }
        }
        Node::Collision(chash, pairs) => match pairs.iter().position(|(k, _)| hasher.eq(k, key)) {
            None => Deleted::Absent,
            Some(pos) => {
                let mut new_pairs = pairs.clone();
                new_pairs.remove(pos);
                if new_pairs.is_empty() {
                    Deleted::Removed(None)
                } else if new_pairs.len() == 1 {
                    let (k, v) = new_pairs.into_iter().next().expect("length checked above");
                    Deleted::Removed(Some(Rc::new(Node::Leaf(*chash, k, v))))
                } else {
                    Deleted::Removed(Some(Rc::new(Node::Collision(*chash, new_pairs))))
                }
            }
        },
        Node::Bitmap(bitmap, entries) => {
            let idx = level_index(hash, level);
            let mask = 1u32 << idx;
            if bitmap & mask == 0 {
                return Deleted::Absent;
            }
            let compact = (bitmap & (mask - 1)).count_ones() as usize;
            match delete(&entries[compact], level + 1, hash, key, hasher) {
                Deleted::Absent => Deleted::Absent,
                Deleted::Removed(None) => compact_after_removal(bitmap & !mask, entries.clone(), compact),
                Deleted::Removed(Some(new_child)) => {
                    let mut new_entries = entries.clone();
                    new_entries[compact] = new_child;
                    Deleted::Removed(Some(Rc::new(Node::Bitmap(*bitmap, new_entries))))
                }
            }
        }
        Node::Array(children) => {
            let idx = level_index(hash, level);
            match &children[idx] {
                None => Deleted::Absent,
                Some(child) => match delete(child, level + 1, hash, key, hasher) {
                    Deleted::Absent => Deleted::Absent,
                    Deleted::Removed(None) => compact_array_after_removal(children.clone(), idx),
                    Deleted::Removed(Some(new_child)) => {
                        let mut new_children = children.clone();
                        new_children[idx] = Some(new_child);
                        Deleted::Removed(Some(Rc::new(Node::Array(new_children))))
                    }
                },
            }
        }
    }
}
