// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! A persistent, immutable, ordered associative mapping (`SortedMap`)
//! backed by a copy-on-write B+tree of branching factor 32: in-order
//! iteration, forward and reverse, seekable by key.

#![deny(missing_docs)]

mod error;
mod iter;
mod map;
mod node;

pub use self::error::SortedMapError;
pub use self::iter::Iter;
pub use self::map::SortedMap;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_has_zero_length() {
        let map: SortedMap<i64, i64> = SortedMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(map.get(&1).is_none());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let map: SortedMap<i64, i64> = SortedMap::new().set(1, 100);
        assert_eq!(*map.get(&1).unwrap(), 100);
    }

    #[test]
    fn overwrite_scenario() {
        // spec §8, concrete scenario 3 (applies equally to SortedMap).
        let map: SortedMap<String, i64> =
            SortedMap::new().set("jane".to_string(), 100).set("susy".to_string(), 200).set("jane".to_string(), 300);
        assert_eq!(map.len(), 2);
        assert_eq!(*map.get(&"jane".to_string()).unwrap(), 300);
        assert!(map.get(&"john".to_string()).is_none());
    }

    #[test]
    fn ordered_iteration_scenario() {
        // spec §8, concrete scenario 5.
        let map: SortedMap<String, i64> =
            SortedMap::new().set("c".to_string(), 3).set("a".to_string(), 1).set("b".to_string(), 2);
        let keys: Vec<String> = map.iter().map(|(k, _)| (*k).clone()).collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn delete_missing_key_is_identity() {
        let m: SortedMap<String, i64> = SortedMap::new().set("a".to_string(), 1);
        let deleted = m.clone().delete(&"b".to_string());
        assert_eq!(m, deleted);
    }

    #[test]
    fn delete_is_idempotent() {
        let m: SortedMap<i64, i64> = SortedMap::new().set(1, 1).set(2, 2);
        let once = m.clone().delete(&1);
        let twice = once.clone().delete(&1);
        assert_eq!(once, twice);
    }

    #[test]
    fn prior_observations_survive_mutation() {
        // spec §8, universal invariant 1.
        let base: SortedMap<i64, i64> = (0..10).map(|i| (i, i)).collect();
        let before: Vec<_> = base.iter().map(|(k, v)| (*k, *v)).collect();
        let _after = base.clone().set(0, 99).delete(&5);
        let still: Vec<_> = base.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(before, still);
    }

    #[test]
    fn reverse_iteration_mirrors_forward() {
        let map: SortedMap<i64, i64> = (0..50).map(|i| (i, i)).collect();
        let forward: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
        let mut backward: Vec<i64> = map.iter_rev().map(|(k, _)| *k).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_map_iteration_is_immediately_done() {
        let map: SortedMap<i64, i64> = SortedMap::new();
        let mut it = map.iter();
        assert!(it.done());
        assert!(it.next().is_none());
        let mut rev = map.iter_rev();
        assert!(rev.done());
        assert!(rev.next().is_none());
    }

    #[test]
    fn forward_seek_positions_at_least_key_greater_or_equal() {
        let map: SortedMap<i64, i64> = (0..100).step_by(2).map(|i| (i, i)).collect();
        let mut it = map.iter();
        it.seek(&41);
        assert_eq!(it.next().map(|(k, _)| *k), Some(42));
        assert_eq!(it.next().map(|(k, _)| *k), Some(44));
    }

    #[test]
    fn reverse_seek_positions_at_greatest_key_less_or_equal() {
        let map: SortedMap<i64, i64> = (0..100).step_by(2).map(|i| (i, i)).collect();
        let mut it = map.iter_rev();
        it.seek(&41);
        assert_eq!(it.next().map(|(k, _)| *k), Some(40));
        assert_eq!(it.next().map(|(k, _)| *k), Some(38));
    }

    #[test]
    fn seek_past_every_key_is_immediately_done() {
        let map: SortedMap<i64, i64> = (0..10).map(|i| (i, i)).collect();
        let mut it = map.iter();
        it.seek(&1000);
        assert!(it.done());
        assert_eq!(it.next(), None);
    }

    #[test]
    fn seek_before_every_key_is_immediately_done_in_reverse() {
        let map: SortedMap<i64, i64> = (0..10).map(|i| (i, i)).collect();
        let mut it = map.iter_rev();
        it.seek(&-5);
        assert!(it.done());
        assert_eq!(it.next(), None);
    }

    #[test]
    fn splits_and_merges_survive_ten_thousand_sequential_keys() {
        // spec §8, concrete scenario 6.
        let mut map: SortedMap<i64, i64> = SortedMap::new();
        for i in 0..10_000i64 {
            map = map.set(i, i);
        }
        for i in (0..10_000i64).step_by(2) {
            map = map.delete(&i);
        }
        assert_eq!(map.len(), 5_000);
        let keys: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
        let expected: Vec<i64> = (1..10_000).step_by(2).collect();
        assert_eq!(keys, expected);

        let restored = map.set(4, 4);
        assert!(restored.contains_key(&4));
        let restored_keys: Vec<i64> = restored.iter().map(|(k, _)| *k).collect();
        let mut expected_restored = expected.clone();
        expected_restored.insert(2, 4);
        assert_eq!(restored_keys, expected_restored);
    }

    #[test]
    fn small_branching_factor_still_splits_and_merges_correctly() {
        let mut map: SortedMap<i64, i64> = SortedMap::new_with_branching_factor(4);
        for i in 0..500i64 {
            map = map.set(i, i * 10);
        }
        assert_eq!(map.len(), 500);
        for i in (0..500i64).step_by(3) {
            map = map.delete(&i);
        }
        let keys: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
        let expected: Vec<i64> = (0..500).filter(|i| i % 3 != 0).collect();
        assert_eq!(keys, expected);
        for k in &expected {
            assert_eq!(*map.get(k).unwrap(), k * 10);
        }
    }

    #[test]
    fn try_with_comparer_without_capability_fails() {
        let result: Result<SortedMap<i64, i64>, _> = SortedMap::try_with_comparer(None);
        assert!(result.is_err());
    }
}
