// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::rc::Rc;

use crate::node::Node;

enum Entry<K, V> {
    Child(Rc<Node<K, V>>),
    Item(Rc<K>, Rc<V>),
}

impl<K, V> Clone for Entry<K, V> {
    fn clone(&self) -> Self {
        match self {
            Entry::Child(n) => Entry::Child(Rc::clone(n)),
            Entry::Item(k, v) => Entry::Item(Rc::clone(k), Rc::clone(v)),
        }
    }
}

fn entries<K, V>(node: &Node<K, V>) -> Vec<Entry<K, V>> {
    match node {
        Node::Leaf(_, k, v) => vec![Entry::Item(Rc::clone(k), Rc::clone(v))],
        Node::Collision(_, pairs) => pairs.iter().map(|(k, v)| Entry::Item(Rc::clone(k), Rc::clone(v))).collect(),
        Node::Bitmap(_, children) => children.iter().cloned().map(Entry::Child).collect(),
        Node::Array(children) => children.iter().filter_map(Clone::clone).map(Entry::Child).collect(),
    }
}

/// A deterministic depth-first traversal of `(key, value)` pairs over a
/// frozen HAMT. Bitmap and array entries are visited in the order of their
/// set bit / slot index; collision-node entries are visited in the order
/// they were inserted. The iterator owns its own stack of frames and never
/// mutates the trie it was built from.
pub struct Iter<K, V> {
    stack: Vec<(Vec<Entry<K, V>>, usize)>,
}

impl<K, V> Iter<K, V> {
    pub(crate) fn new(root: &Rc<Node<K, V>>) -> Self {
        let mut it = Iter { stack: Vec::new() };
        it.push(Rc::clone(root));
        it
    }

    fn push(&mut self, node: Rc<Node<K, V>>) {
        let ents = entries(&node);
        self.stack.push((ents, 0));
    }
}

impl<K, V> Iterator for Iter<K, V> {
    type Item = (Rc<K>, Rc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (ents, idx) = self.stack.last_mut()?;
            if *idx >= ents.len() {
                self.stack.pop();
                continue;
            }
            let entry = ents[*idx].clone();
            *idx += 1;
            match entry {
                Entry::Item(k, v) => return Some((k, v)),
                Entry::Child(node) => self.push(node),
            }
        }
    }
}
