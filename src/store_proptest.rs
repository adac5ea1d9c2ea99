#![cfg(test)]

// Property tests for Store kept inside the crate so they can reach the
// private backing store directly.

use crate::store::Store;
use proptest::prelude::*;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

prop_compose! {
    fn arb_key()(s in "[a-z]{0,3}") -> Key { Key(s) }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Key, i32),
    Get(String),
    Iterate,
    Reverse,
}

prop_compose! {
    fn arb_ops()(ops in proptest::collection::vec(
        prop_oneof![
            3 => (arb_key(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
            2 => "[a-z]{0,3}".prop_map(Op::Get),
            1 => Just(Op::Iterate),
            1 => Just(Op::Reverse),
        ], 1..100)) -> Vec<Op> { ops }
}

// State machine harness over Store against an ordered Vec model with
// last-value-wins, first-position-kept semantics.
proptest! {
    #[test]
    fn prop_store_matches_ordered_model(ops in arb_ops()) {
        let mut sut: Store<Key, i32> = Store::new();
        let mut model: Vec<(Key, i32)> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let prev = sut.insert(k.clone(), v);
                    match model.iter_mut().find(|(mk, _)| *mk == k) {
                        Some(slot) => {
                            prop_assert_eq!(prev, Some(slot.1));
                            slot.1 = v;
                        }
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((k, v));
                        }
                    }
                }
                Op::Get(q) => {
                    let expected = model.iter().position(|(mk, _)| mk.0 == q);
                    prop_assert_eq!(sut.find(q.as_str()), expected);
                    prop_assert_eq!(sut.get(q.as_str()), expected.map(|i| &model[i].1));
                    prop_assert_eq!(sut.contains_key(q.as_str()), expected.is_some());
                }
                Op::Iterate => {
                    let got: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                    prop_assert_eq!(&got, &model);
                }
                Op::Reverse => {
                    let got: Vec<&Key> = sut.iter().rev().map(|(k, _)| k).collect();
                    let expected: Vec<&Key> = model.iter().rev().map(|(k, _)| k).collect();
                    prop_assert_eq!(got, expected);
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        // Final: every model pair resolves to the same position and value.
        for (i, (k, v)) in model.iter().enumerate() {
            prop_assert_eq!(sut.find(k), Some(i));
            prop_assert_eq!(sut.get_index(i), Some((k, v)));
        }
    }
}

// Building from pairs agrees with std HashMap on the final contents.
proptest! {
    #[test]
    fn prop_from_iter_last_value_wins(pairs in proptest::collection::vec((0u8..16, any::<i64>()), 0..64)) {
        let store: Store<u8, i64> = pairs.iter().copied().collect();
        let model: HashMap<u8, i64> = pairs.iter().copied().collect();
        prop_assert_eq!(store.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(store.get(k), Some(v));
        }

        let mut first_seen: Vec<u8> = Vec::new();
        for (k, _) in &pairs {
            if !first_seen.contains(k) { first_seen.push(*k); }
        }
        let order: Vec<u8> = store.iter().map(|(k, _)| *k).collect();
        prop_assert_eq!(order, first_seen);
    }
}
