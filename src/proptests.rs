use crate::{hash_nub, Map, Set};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
}

fn values() -> impl Strategy<Value = Vec<u16>> {
    // A narrow domain makes overlaps between sets common.
    prop::collection::vec(0u16..512, 0..=256)
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    let key = 0u16..1024;
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(key, value)| Op::Insert(key, value)),
        30 => key.clone().prop_map(Op::Remove),
        20 => key.prop_map(Op::Get),
    ];

    prop::collection::vec(op, 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn equivalent_to_hash_map(ops in ops()) {
        let mut map = Map::new();
        let mut oracle = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    map = map.insert(key, value);
                    oracle.insert(key, value);
                }
                Op::Remove(key) => {
                    map = map.remove(&key);
                    oracle.remove(&key);
                }
                Op::Get(key) => {
                    prop_assert_eq!(map.get(&key), oracle.get(&key));
                }
            }

            prop_assert_eq!(map.len(), oracle.len());
        }

        prop_assert_eq!(map.iter().count(), oracle.len());
        prop_assert!(map.iter().all(|(key, value)| oracle.get(key) == Some(value)));
    }

    #[test]
    fn reingest_sequence(values in values()) {
        let set = values.iter().copied().collect::<Set<_>>();

        prop_assert_eq!(set.iter().copied().collect::<Set<_>>(), set.clone());
        prop_assert_eq!(set.clone().into_iter().collect::<Set<_>>(), set);
    }

    #[test]
    fn insert_and_remove(values in values(), value in 0u16..512) {
        let set = values.into_iter().collect::<Set<_>>();
        let inserted = set.insert(value);

        prop_assert!(inserted.contains(&value));
        prop_assert!(!inserted.remove(&value).contains(&value));

        if set.contains(&value) {
            prop_assert_eq!(inserted.remove(&value), set.remove(&value));
        } else {
            prop_assert_eq!(inserted.remove(&value), set);
        }
    }

    #[test]
    fn insert_then_remove_keeps_other_values(values in values(), key in 0u16..512, value in any::<u32>()) {
        let map = values.iter().map(|&key| (key, u32::from(key))).collect::<Map<_, _>>();
        let removed = map.insert(key, value).remove(&key);

        prop_assert_eq!(removed, map.remove(&key));
    }

    #[test]
    fn union(one in values(), other in values()) {
        let (one, other) = (
            one.into_iter().collect::<Set<_>>(),
            other.into_iter().collect::<Set<_>>(),
        );
        let union = one.union(&other);
        let disjoint = one.intersection(&other).is_empty();

        prop_assert!(union.len() <= one.len() + other.len());
        prop_assert_eq!(union.len() == one.len() + other.len(), disjoint);

        for value in 0..512 {
            prop_assert_eq!(
                union.contains(&value),
                one.contains(&value) || other.contains(&value)
            );
        }
    }

    #[test]
    fn union_keeps_left_values(one in values(), other in values()) {
        let one = one.into_iter().map(|key| (key, 0)).collect::<Map<_, _>>();
        let other = other.into_iter().map(|key| (key, 1)).collect::<Map<_, _>>();
        let union = one.union(&other);

        for (key, value) in &union {
            prop_assert_eq!(*value, if one.contains_key(key) { 0 } else { 1 });
        }
    }

    #[test]
    fn intersection_and_difference(one in values(), other in values()) {
        let oracle = (
            one.iter().copied().collect::<HashSet<_>>(),
            other.iter().copied().collect::<HashSet<_>>(),
        );
        let (one, other) = (
            one.into_iter().collect::<Set<_>>(),
            other.into_iter().collect::<Set<_>>(),
        );
        let intersection = one.intersection(&other);
        let difference = one.difference(&other);

        prop_assert_eq!(
            intersection.iter().copied().collect::<HashSet<_>>(),
            &oracle.0 & &oracle.1
        );
        prop_assert_eq!(
            difference.iter().copied().collect::<HashSet<_>>(),
            &oracle.0 - &oracle.1
        );
        prop_assert_eq!(intersection.union(&difference), one);
    }

    #[test]
    fn filter(values in values(), divisor in 1u16..8) {
        let set = values.into_iter().collect::<Set<_>>();
        let filtered = set.filter(|value| value % divisor == 0);

        prop_assert!(filtered.len() <= set.len());
        prop_assert!(filtered.iter().all(|value| value % divisor == 0));
        prop_assert!(set
            .iter()
            .filter(|value| *value % divisor == 0)
            .all(|value| filtered.contains(value)));
    }

    #[test]
    fn insertion_order_independence(values in values()) {
        let mut reversed = values.clone();
        reversed.reverse();

        prop_assert_eq!(
            values.into_iter().collect::<Set<_>>(),
            reversed.into_iter().collect::<Set<_>>()
        );
    }

    #[test]
    fn remove_non_member(values in values()) {
        let set = values.into_iter().collect::<Set<_>>();
        let removed = set.remove(&1024);

        prop_assert!(removed.ptr_eq(&set));
    }

    #[test]
    fn map_collapses_values(values in values()) {
        let set = values.into_iter().collect::<Set<_>>();
        let mapped = set.map(|value| value % 2);

        prop_assert_eq!(
            mapped.len(),
            set.iter().map(|value| value % 2).collect::<HashSet<_>>().len()
        );
    }

    #[test]
    fn nub_keeps_first_occurrences(values in values()) {
        let nubbed = hash_nub(values.clone()).collect::<Vec<_>>();
        let mut seen = HashSet::new();

        prop_assert_eq!(
            nubbed,
            values.into_iter().filter(|value| seen.insert(*value)).collect::<Vec<_>>()
        );
    }
}

#[test]
fn nub_example() {
    assert_eq!(hash_nub([2, 1, 2, 3, 1]).collect::<Vec<_>>(), vec![2, 1, 3]);
}

#[test]
fn map_example() {
    let set = [1, 2, 3, 4].into_iter().collect::<Set<usize>>();

    assert_eq!(set.map(|value| value % 2), [0, 1].into_iter().collect());
}
