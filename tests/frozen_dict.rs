// FrozenDict unit test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Construction: every input shape yields the same entries; repeated keys
//   keep the last value at the first position; named fields override.
// - Reads: lookups are stable and a missing key is distinct from a falsy
//   value.
// - Iteration: insertion order forwards and backwards, restartable.
// - Union: right-biased; the reflected form flips precedence.
// - Equality: by pairs, order-insensitive, symmetric across map types.
// - Copying: clone is the same instance; deep copy always rebuilds.
use frozen_dict::{deep_copy, frozendict, Error, FrozenDict, Mapping};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

fn ab() -> FrozenDict<&'static str, i32> {
    FrozenDict::from_pairs([("a", 1), ("b", 2)])
}

// Test: all construction forms agree.
// Assumes: from_pairs, FromIterator, From<[_; N]>, from_mapping and the
// macro are thin front-ends over one builder.
// Verifies: equal maps with identical insertion order.
#[test]
fn construction_forms_agree() {
    let pairs = FrozenDict::from_pairs(vec![("a", 1), ("b", 2)]);
    let collected: FrozenDict<_, _> = vec![("a", 1), ("b", 2)].into_iter().collect();
    let array = FrozenDict::from([("a", 1), ("b", 2)]);
    let tree: BTreeMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
    let mapped = FrozenDict::from_mapping(&tree);
    let macro_built = frozendict! { "a" => 1, "b" => 2 };

    for m in [&collected, &array, &mapped, &macro_built] {
        assert_eq!(*m, pairs);
        assert_eq!(m.to_pairs(), vec![("a", 1), ("b", 2)]);
    }
}

// Test: the empty map.
// Verifies: no entries, renders as `FrozenDict()`.
#[test]
fn empty_map() {
    let m: FrozenDict<String, i32> = frozendict! {};
    assert_eq!(m.len(), 0);
    assert!(m.iter().next().is_none());
    assert!(m.reversed().next().is_none());
    assert_eq!(m.to_string(), "FrozenDict()");
}

// Test: duplicate keys during construction.
// Assumes: standard mapping construction semantics.
// Verifies: last value wins; the key stays at its first position.
#[test]
fn duplicate_keys_last_value_wins() {
    let m = FrozenDict::from_pairs([("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(m.len(), 2);
    assert_eq!(m["a"], 3);
    assert_eq!(m.to_pairs(), vec![("a", 3), ("b", 2)]);
}

// Test: named fields merge over a positional source.
// Verifies: {a:1} plus a=2 gives {a:2}; new field names are appended.
#[test]
fn named_fields_override_positional_source() {
    let m: FrozenDict<String, i32> =
        FrozenDict::with_fields([("a".to_string(), 1)], [("a", 2), ("z", 26)]);
    assert_eq!(m.len(), 2);
    assert_eq!(m["a"], 2);
    assert_eq!(m["z"], 26);

    let via_macro: FrozenDict<&str, i32> = frozendict! { [("a", 1)]; a = 2 };
    assert_eq!(via_macro, FrozenDict::from_pairs([("a", 2)]));

    let fields_only: FrozenDict<String, i32> = frozendict! { one = 1, two = 2 };
    assert_eq!(fields_only.keys().iter().cloned().collect::<Vec<_>>(), ["one", "two"]);
}

// Test: from_keys shares one default value across keys.
// Verifies: one entry per distinct key; all values equal the default.
#[test]
fn from_keys_shares_default() {
    let m = FrozenDict::from_keys(["k1", "k2", "k3"], 0u8);
    assert_eq!(m.len(), 3);
    assert!(m.values().iter().all(|v| *v == 0));

    let dup = FrozenDict::from_keys(["k1", "k1", "k2"], "v");
    assert_eq!(dup.len(), 2);

    let none: FrozenDict<i32, Option<i32>> = FrozenDict::from_keys_default([1, 2]);
    assert_eq!(none.get(&1), Some(&None));
    assert_eq!(none.get(&2), Some(&None));
}

// Test: missing keys versus present falsy values.
// Verifies: get_item errors only for absent keys; get never fails.
#[test]
fn lookups_distinguish_missing_keys() {
    let m = FrozenDict::from_pairs([("empty", String::new())]);
    assert_eq!(m.get_item("empty").map(String::as_str), Ok(""));
    assert_eq!(m.get_item("absent"), Err(Error::MissingKey));
    assert_eq!(m.get("absent"), None);
    assert!(m.contains_key("empty"));
    assert!(!m.contains_key("absent"));
    assert_eq!(m.get_key_value("empty"), Some((&"empty", &String::new())));
}

// Test: iteration is insertion ordered and restartable.
// Verifies: a fresh iterator always starts at the first key; reversed walks
// keys back to front.
#[test]
fn iteration_order_and_restart() {
    let m = FrozenDict::from_pairs([(3, "c"), (1, "a"), (2, "b")]);
    let first: Vec<_> = m.keys().iter().copied().collect();
    let second: Vec<_> = m.keys().iter().copied().collect();
    assert_eq!(first, vec![3, 1, 2]);
    assert_eq!(first, second);
    assert_eq!(m.reversed().copied().collect::<Vec<_>>(), vec![2, 1, 3]);

    let mut it = m.iter();
    assert_eq!(it.len(), 3);
    assert_eq!(it.next(), Some((&3, &"c")));
    assert_eq!(it.next_back(), Some((&2, &"b")));
    assert_eq!(it.len(), 1);
}

// Test: union is right-biased.
// Verifies: {a:1,b:2} | {b:3,c:4} == {a:1,b:3,c:4} and the flipped order
// gives {a:1,b:2,c:4}.
#[test]
fn union_right_bias() {
    let m1 = ab();
    let m2 = FrozenDict::from_pairs([("b", 3), ("c", 4)]);

    assert_eq!(m1.union(&m2), FrozenDict::from_pairs([("a", 1), ("b", 3), ("c", 4)]));
    assert_eq!(m2.union(&m1), FrozenDict::from_pairs([("a", 1), ("b", 2), ("c", 4)]));
    assert_eq!(&m1 | &m2, m1.union(&m2));
    assert_eq!(m1.union(&m2).to_pairs(), vec![("a", 1), ("b", 3), ("c", 4)]);
}

// Test: union with foreign maps in both operand positions.
// Assumes: `&HashMap | &FrozenDict` dispatches to the reflected union.
// Verifies: the right operand wins in both directions; output is frozen.
#[test]
fn union_with_std_maps() {
    let m = ab();
    let std_map: HashMap<&str, i32> = [("b", 20)].into_iter().collect();

    let left: FrozenDict<_, _> = &m | &std_map;
    assert_eq!(left["b"], 20);

    let right: FrozenDict<_, _> = &std_map | &m;
    assert_eq!(right["b"], 2);
    assert_eq!(right.keys().iter().next(), Some(&"b"));
    assert_eq!(m.reflected_union(&std_map), right);

    let tree: BTreeMap<&str, i32> = [("c", 3)].into_iter().collect();
    assert_eq!((&tree | &m).len(), 3);
}

// Test: union does not touch its operands.
// Verifies: new instance; operands unchanged.
#[test]
fn union_returns_new_instance() {
    let m = ab();
    let empty: FrozenDict<&str, i32> = FrozenDict::new();
    let u = m.union(&empty);
    assert_eq!(u, m);
    assert!(!u.ptr_eq(&m));
    assert_eq!(m.len(), 2);
}

// Test: equality ignores insertion order and crosses map types.
// Verifies: symmetric equality with HashMap, BTreeMap and hashbrown maps.
#[test]
fn cross_type_equality() {
    let m = FrozenDict::from_pairs([("x", 1), ("y", 2)]);
    let reordered = FrozenDict::from_pairs([("y", 2), ("x", 1)]);
    assert_eq!(m, reordered);

    let std_map: HashMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
    let tree: BTreeMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
    let brown: hashbrown::HashMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
    assert!(m == std_map && std_map == m);
    assert!(m == tree && tree == m);
    assert!(m == brown && brown == m);

    let different: HashMap<&str, i32> = [("x", 1), ("y", 3)].into_iter().collect();
    assert!(m != different && different != m);
    let smaller: HashMap<&str, i32> = [("x", 1)].into_iter().collect();
    assert!(m != smaller && smaller != m);
}

// Test: identity is checked before value equality.
// Assumes: identity means the same value slot, not a shared pointee.
// Verifies: a map equals itself through any path even with a NaN value;
// separate Rc clones of one NaN are compared by value and differ.
#[test]
fn value_identity_precedes_equality() {
    let m = FrozenDict::from_pairs([("x", f64::NAN)]);
    assert!(m.eq_mapping(&m));
    assert_eq!(m, m.clone());

    let shared = Rc::new(f64::NAN);
    let a = FrozenDict::from_pairs([("x", Rc::clone(&shared))]);
    let b: HashMap<&str, Rc<f64>> = [("x", Rc::clone(&shared))].into_iter().collect();
    assert!(a.eq_mapping(&a));
    assert!(a != b && b != a);
}

// Test: shallow copy is identity.
// Verifies: clone shares the backing store.
#[test]
fn clone_is_same_instance() {
    let m = FrozenDict::from_pairs([("one", RefCell::new(1))]);
    let c = m.clone();
    assert!(c.ptr_eq(&m));
    *c["one"].borrow_mut() = 5;
    assert_eq!(*m["one"].borrow(), 5);
}

// Test: deep copy always rebuilds the base map.
// Verifies: new instance, equal contents, mutable values no longer shared.
#[test]
fn deep_copy_rebuilds() {
    let m = FrozenDict::from_pairs([("one", 1), ("two", 2)]);
    let d = deep_copy(&m);
    assert!(!d.ptr_eq(&m));
    assert_eq!(d, m);

    let cells = FrozenDict::from_pairs([("one", RefCell::new(vec![1]))]);
    let copy = deep_copy(&cells);
    copy["one"].borrow_mut().push(2);
    assert_eq!(*cells["one"].borrow(), vec![1]);
}

// Test: deep copy memoizes shared frozen maps.
// Assumes: two handles to one store inside a container form one memo entry.
// Verifies: the copies share one new store.
#[test]
fn deep_copy_memo_preserves_sharing() {
    let inner = FrozenDict::from_pairs([(1, Rc::new(RefCell::new(0)))]);
    let outer = vec![inner.clone(), inner.clone()];
    let copy = deep_copy(&outer);
    assert!(copy[0].ptr_eq(&copy[1]));
    assert!(!copy[0].ptr_eq(&inner));
}

// Test: the entries are enough to rebuild an equal map.
// Verifies: to_pairs/from_pairs round-trip, including order.
#[test]
fn constructor_arguments_round_trip() {
    let m = FrozenDict::from_pairs([(2, 'b'), (1, 'a')]);
    let rebuilt = FrozenDict::from_pairs(m.to_pairs());
    assert_eq!(rebuilt, m);
    assert_eq!(rebuilt.to_pairs(), m.to_pairs());
}

// Test: the Mapping trait on the frozen map itself.
// Verifies: generic code sees len, lookup and keys.
#[test]
fn frozen_dict_is_mapping_like() {
    fn total<M: Mapping<&'static str, i32>>(m: &M) -> i32 {
        m.keys().filter_map(|k| m.lookup(k)).sum()
    }
    let m = ab();
    assert_eq!(total(&m), 3);
    assert_eq!(Mapping::len(&m), 2);
}

// Test: views stay consistent with the map.
// Verifies: views report the map's length and contents.
#[test]
fn views_reflect_map() {
    let m = ab();
    let keys = m.keys();
    let values = m.values();
    let items = m.items();
    assert_eq!((keys.len(), values.len(), items.len()), (2, 2, 2));
    assert!(keys.contains("a"));
    assert!(values.contains(&2));
    assert!(items.contains(&"b", &2));
    assert_eq!(items.iter().collect::<Vec<_>>(), m.iter().collect::<Vec<_>>());
}

// Test: display formats.
// Verifies: `FrozenDict({k: v, ...})` using each entry's Debug form.
#[test]
fn display_format() {
    let m = FrozenDict::from_pairs([("a".to_string(), vec![1])]);
    assert_eq!(m.to_string(), r#"FrozenDict({"a": [1]})"#);
}
