// Copyright 2019-2020 PolkaX Authors. Licensed under GPL-3.0.

//! A persistent, immutable, unordered associative mapping (`Map`) backed by
//! a Hash-Array Mapped Trie: bitmap-indexed sparse interior nodes, array
//! nodes for dense occupancy, and hash-collision nodes for keys whose hashes
//! agree on every bit the trie consumes.

#![deny(missing_docs)]

mod error;
mod iter;
mod map;
mod node;

pub use self::error::HamtError;
pub use self::iter::Iter;
pub use self::map::Map;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::rc::Rc;

    use immutable_capability::Hasher;

    /// A hasher that collapses every key to the same 32-bit hash, used to
    /// force the HAMT down its hash-collision-node path deterministically.
    struct ConstantHasher;

    impl Hasher<i64> for ConstantHasher {
        fn hash(&self, _key: &i64) -> u32 {
            7
        }

        fn eq(&self, a: &i64, b: &i64) -> bool {
            a == b
        }
    }

    #[test]
    fn empty_map_has_zero_length() {
        let map: Map<i64, i64> = Map::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(map.get(&1).is_none());
    }

    #[test]
    fn set_then_get_roundtrips() {
        let map: Map<i64, i64> = Map::new().set(1, 100);
        assert_eq!(*map.get(&1).unwrap(), 100);
    }

    #[test]
    fn overwrite_scenario() {
        // spec §8, concrete scenario 3.
        let map: Map<String, i64> =
            Map::new().set("jane".to_string(), 100).set("susy".to_string(), 200).set("jane".to_string(), 300);
        assert_eq!(map.len(), 2);
        assert_eq!(*map.get(&"jane".to_string()).unwrap(), 300);
        assert!(map.get(&"john".to_string()).is_none());
    }

    #[test]
    fn delete_missing_key_is_identity() {
        // spec §8, concrete scenario 4.
        let m: Map<String, i64> = Map::new().set("a".to_string(), 1);
        let deleted = m.clone().delete(&"b".to_string());
        let mut m_entries: Vec<_> = m.iter().map(|(k, v)| ((*k).clone(), *v)).collect();
        let mut d_entries: Vec<_> = deleted.iter().map(|(k, v)| ((*k).clone(), *v)).collect();
        m_entries.sort();
        d_entries.sort();
        assert_eq!(m_entries, d_entries);
    }

    #[test]
    fn delete_is_idempotent() {
        let m: Map<i64, i64> = Map::new().set(1, 1).set(2, 2);
        let once = m.clone().delete(&1);
        let twice = once.clone().delete(&1);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.get(&1).is_none(), twice.get(&1).is_none());
        assert_eq!(*once.get(&2).unwrap(), *twice.get(&2).unwrap());
    }

    #[test]
    fn delete_shrinks_length_and_prior_map_is_unaffected() {
        let m: Map<i64, i64> = Map::new().set(1, 1).set(2, 2).set(3, 3);
        let shrunk = m.clone().delete(&2);
        assert_eq!(shrunk.len(), 2);
        assert!(shrunk.get(&2).is_none());
        assert_eq!(m.len(), 3);
        assert_eq!(*m.get(&2).unwrap(), 2);
    }

    #[test]
    fn hash_collision_node_holds_both_keys() {
        let hasher: Rc<dyn Hasher<i64>> = Rc::new(ConstantHasher);
        let map: Map<i64, &str> = Map::with_hasher(hasher).set(1, "one").set(2, "two");
        assert_eq!(map.len(), 2);
        assert_eq!(*map.get(&1).unwrap(), "one");
        assert_eq!(*map.get(&2).unwrap(), "two");
        let collected: HashSet<i64> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(collected, [1, 2].into_iter().collect());
    }

    #[test]
    fn collision_node_survives_partial_delete() {
        let hasher: Rc<dyn Hasher<i64>> = Rc::new(ConstantHasher);
        let map: Map<i64, &str> = Map::with_hasher(hasher).set(1, "one").set(2, "two").set(3, "three");
        let shrunk = map.clone().delete(&2);
        assert_eq!(shrunk.len(), 2);
        assert!(shrunk.get(&2).is_none());
        assert_eq!(*shrunk.get(&1).unwrap(), "one");
        assert_eq!(*shrunk.get(&3).unwrap(), "three");
        assert_eq!(*map.get(&2).unwrap(), "two");
    }

    #[test]
    fn promotes_and_demotes_across_array_threshold() {
        let mut map: Map<i64, i64> = Map::new();
        for i in 0..20 {
            map = map.set(i, i * 10);
        }
        assert_eq!(map.len(), 20);
        for i in 0..20 {
            assert_eq!(*map.get(&i).unwrap(), i * 10);
        }
        for i in 0..15 {
            map = map.delete(&i);
        }
        assert_eq!(map.len(), 5);
        for i in 15..20 {
            assert_eq!(*map.get(&i).unwrap(), i * 10);
        }
    }

    #[test]
    fn handles_many_keys_without_losing_any() {
        let mut map: Map<i64, i64> = Map::new();
        for i in 0..2000 {
            map = map.set(i, i);
        }
        assert_eq!(map.len(), 2000);
        for i in 0..2000 {
            assert_eq!(*map.get(&i).unwrap(), i);
        }
        let seen: HashSet<i64> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(seen.len(), 2000);
    }

    #[test]
    fn empty_map_iteration_yields_nothing() {
        let map: Map<i64, i64> = Map::new();
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn prior_observations_survive_mutation() {
        // spec §8, universal invariant 1.
        let base: Map<i64, i64> = (0..10).map(|i| (i, i)).collect();
        let before: Vec<_> = {
            let mut v: Vec<_> = base.iter().map(|(k, v)| (*k, *v)).collect();
            v.sort();
            v
        };
        let _after = base.clone().set(0, 99).delete(&5);
        let mut still: Vec<_> = base.iter().map(|(k, v)| (*k, *v)).collect();
        still.sort();
        assert_eq!(before, still);
    }

    #[test]
    fn try_with_hasher_without_capability_fails() {
        let result: Result<Map<i64, i64>, _> = Map::try_with_hasher(None);
        assert!(result.is_err());
    }
}
