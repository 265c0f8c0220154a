// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

use std::alloc::{GlobalAlloc, Layout, System};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use immutable_hamt::Map;
use proptest::prelude::*;

/// Counts allocation calls that pass through the global allocator, used to
/// observe spec §8 universal invariant 8 ("inserting one key into a map of
/// `n` keys allocates `O(log n)` nodes") from outside the crate, since the
/// trie's node type is private to it.
struct CountingAllocator;

static LIVE_ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        LIVE_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator;

#[test]
fn inserting_one_key_into_a_large_map_allocates_far_fewer_nodes_than_its_length() {
    let n = 50_000i64;
    let mut map: Map<i64, i64> = Map::new();
    for i in 0..n {
        map = map.set(i, i);
    }
    let before = LIVE_ALLOCATIONS.load(Ordering::Relaxed);
    let updated = map.clone().set(n, n);
    let after = LIVE_ALLOCATIONS.load(Ordering::Relaxed);
    assert_eq!(*updated.get(&n).unwrap(), n);
    assert!(map.get(&n).is_none());
    // A path copy touches one node per trie level (six levels of five bits
    // each, at most) plus a small constant for bookkeeping; a full rebuild of
    // the trie would allocate on the order of `n` nodes, so a margin well
    // below `n` still distinguishes the two while tolerating allocator noise
    // from tests running on other threads.
    assert!(
        after - before < (n as usize) / 100,
        "set allocated {} times, expected O(log n)",
        after - before
    );
}

proptest! {
    #[test]
    fn set_then_get_matches_a_reference_hashmap(
        ops in prop::collection::vec((any::<i64>(), any::<i64>()), 0..200)
    ) {
        let mut reference: HashMap<i64, i64> = HashMap::new();
        let mut map: Map<i64, i64> = Map::new();
        for (k, v) in ops {
            reference.insert(k, v);
            map = map.set(k, v);
        }
        prop_assert_eq!(map.len(), reference.len());
        for (k, v) in &reference {
            prop_assert_eq!(map.get(k).map(|rc| *rc), Some(*v));
        }
    }

    #[test]
    fn delete_matches_a_reference_hashmap(
        ops in prop::collection::vec((any::<i64>(), any::<i64>()), 1..100),
        deletions in prop::collection::vec(any::<i64>(), 0..50)
    ) {
        let mut reference: HashMap<i64, i64> = HashMap::new();
        let mut map: Map<i64, i64> = Map::new();
        for (k, v) in ops {
            reference.insert(k, v);
            map = map.set(k, v);
        }
        for k in &deletions {
            let present_before = reference.remove(k).is_some();
            let before_len = map.len();
            map = map.delete(k);
            if present_before {
                prop_assert_eq!(map.len(), before_len - 1);
            } else {
                prop_assert_eq!(map.len(), before_len);
            }
        }
        prop_assert_eq!(map.len(), reference.len());
        for (k, v) in &reference {
            prop_assert_eq!(map.get(k).map(|rc| *rc), Some(*v));
        }
    }

    #[test]
    fn iteration_yields_exactly_the_live_key_set(
        ops in prop::collection::vec((0i64..500, any::<i64>()), 0..300)
    ) {
        let mut reference: HashMap<i64, i64> = HashMap::new();
        let mut map: Map<i64, i64> = Map::new();
        for (k, v) in ops {
            reference.insert(k, v);
            map = map.set(k, v);
        }
        let mut from_iter: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
        let mut from_reference: Vec<i64> = reference.keys().cloned().collect();
        from_iter.sort();
        from_reference.sort();
        prop_assert_eq!(from_iter, from_reference);
    }
}
