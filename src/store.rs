//! Store: insertion-ordered backing store shared by the frozen map types.
//!
//! Entries live densely in a `Vec` in first-insertion order; a `HashTable`
//! indexes positions into that `Vec`. Each entry keeps its precomputed `u64`
//! hash, so resizing the index never calls back into `K: Hash`.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub(crate) struct Store<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<usize>,
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Store<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity_and_hasher(0, Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for Store<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Store<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    #[cfg(test)]
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Position of `q` in insertion order, if present.
    pub fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&i| self.entries[i].key.borrow() == q)
            .copied()
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|i| &self.entries[i].value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|i| {
            let e = &self.entries[i];
            (&e.key, &e.value)
        })
    }

    /// Insert with mapping-construction semantics: a new key is appended; a
    /// repeated key keeps its original position and key, and its value is
    /// replaced. Returns the replaced value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        let entries = &mut self.entries;
        match self.index.entry(
            hash,
            |&i| entries[i].key == key,
            |&i| entries[i].hash,
        ) {
            TableEntry::Occupied(o) => {
                let i = *o.get();
                Some(mem::replace(&mut entries[i].value, value))
            }
            TableEntry::Vacant(v) => {
                let i = entries.len();
                entries.push(Entry { key, value, hash });
                let _ = v.insert(i);
                None
            }
        }
    }
}

impl<K, V, S> Store<K, V, S> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.iter(),
        }
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.first().map(|e| (&e.key, &e.value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.entries.last().map(|e| (&e.key, &e.value))
    }

    pub fn get_index(&self, i: usize) -> Option<(&K, &V)> {
        self.entries.get(i).map(|e| (&e.key, &e.value))
    }

    /// Rebuild the store with every value passed through `f`. Keys, hashes
    /// and positions carry over unchanged, so the index is reused as is.
    pub fn map_values<W, F>(&self, mut f: F) -> Store<K, W, S>
    where
        K: Clone,
        S: Clone,
        F: FnMut(&V) -> W,
    {
        Store {
            hasher: self.hasher.clone(),
            index: self.index.clone(),
            entries: self
                .entries
                .iter()
                .map(|e| Entry {
                    key: e.key.clone(),
                    value: f(&e.value),
                    hash: e.hash,
                })
                .collect(),
        }
    }

    pub fn into_pairs(self) -> Vec<(K, V)> {
        self.entries
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect()
    }

    /// Bytes held on the heap by the entry vector and the index.
    /// `with_control_bytes` also counts the index's control bytes.
    pub fn heap_bytes(&self, with_control_bytes: bool) -> usize {
        let entries = self.entries.capacity() * mem::size_of::<Entry<K, V>>();
        let buckets = buckets_for_capacity(self.index.capacity());
        let slots = buckets * mem::size_of::<usize>();
        let ctrl = if with_control_bytes && buckets > 0 {
            // one control byte per bucket plus a trailing group
            buckets + GROUP_WIDTH
        } else {
            0
        };
        entries + slots + ctrl
    }
}

// Widest SIMD group hashbrown uses; the generic fallback is narrower.
const GROUP_WIDTH: usize = 16;

/// Bucket count behind a table that holds `capacity` items. Tables under
/// eight buckets keep one bucket free; larger ones load up to 7/8.
fn buckets_for_capacity(capacity: usize) -> usize {
    match capacity {
        0 => 0,
        c if c < 8 => (c + 1).next_power_of_two(),
        c => (c * 8 / 7).next_power_of_two(),
    }
}

/// Iterator over the entries of a `Store` in insertion order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|e| (&e.key, &e.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

impl<K, V> FromIterator<(K, V)> for Store<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut store = Store::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            store.insert(k, v);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: a repeated key keeps its first position and takes the last value.
    #[test]
    fn duplicate_insert_overwrites_in_place() {
        let mut s: Store<String, i32> = Store::new();
        assert_eq!(s.insert("a".to_string(), 1), None);
        assert_eq!(s.insert("b".to_string(), 2), None);
        assert_eq!(s.insert("a".to_string(), 3), Some(1));
        assert_eq!(s.len(), 2);

        let order: Vec<_> = s.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(order, vec![("a", 3), ("b", 2)]);
    }

    /// Invariant: `find(k).is_some() == contains_key(k)` for present/absent keys.
    #[test]
    fn find_contains_parity() {
        let s: Store<String, i32> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, k)| ((*k).to_string(), i as i32))
            .collect();

        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            assert_eq!(s.find(*k), Some(i));
            assert!(s.contains_key(*k));
        }
        for k in ["x", "y", "z"] {
            assert!(s.find(k).is_none());
            assert!(!s.contains_key(k));
        }
    }

    /// Invariant: Iteration is insertion ordered in both directions.
    #[test]
    fn iteration_is_double_ended() {
        let s: Store<i32, i32> = (0..5).map(|i| (i, i * 10)).collect();
        let fwd: Vec<_> = s.iter().map(|(k, _)| *k).collect();
        let back: Vec<_> = s.iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(fwd, vec![0, 1, 2, 3, 4]);
        assert_eq!(back, vec![4, 3, 2, 1, 0]);
        assert_eq!(s.iter().len(), 5);
        assert_eq!(s.first(), Some((&0, &0)));
        assert_eq!(s.last(), Some((&4, &40)));
        assert_eq!(s.get_index(2), Some((&2, &20)));
    }

    /// Invariant: Lookups work under heavy hash collisions; equality resolves to the
    /// correct entry.
    #[test]
    fn collision_handling_with_const_hasher() {
        #[derive(Clone, Default)]
        struct ConstBuildHasher;
        struct ConstHasher;
        impl BuildHasher for ConstBuildHasher {
            type Hasher = ConstHasher;
            fn build_hasher(&self) -> Self::Hasher {
                ConstHasher
            }
        }
        impl core::hash::Hasher for ConstHasher {
            fn write(&mut self, _bytes: &[u8]) {}
            fn finish(&self) -> u64 {
                0
            }
        }

        let mut s: Store<String, i32, ConstBuildHasher> = Store::with_hasher(ConstBuildHasher);
        s.insert("a".to_string(), 1);
        s.insert("b".to_string(), 2);
        s.insert("a".to_string(), 10);

        assert_eq!(s.len(), 2);
        assert_eq!(s.get("a"), Some(&10));
        assert_eq!(s.get("b"), Some(&2));
        assert_eq!(s.get_key_value("b"), Some((&"b".to_string(), &2)));
        assert!(s.get("c").is_none());
    }

    /// Invariant: `map_values` keeps keys, order and lookups intact.
    #[test]
    fn map_values_preserves_index() {
        let s: Store<&'static str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let doubled = s.map_values(|v| v * 2);
        assert_eq!(doubled.get("x"), Some(&2));
        assert_eq!(doubled.get("y"), Some(&4));
        assert_eq!(doubled.into_pairs(), vec![("x", 2), ("y", 4)]);
    }

    /// Invariant: item capacity maps back to hashbrown's power-of-two
    /// bucket count, which is never smaller than the capacity.
    #[test]
    fn bucket_count_from_item_capacity() {
        let cases = [(0, 0), (1, 2), (3, 4), (7, 8), (14, 16), (28, 32), (56, 64), (112, 128)];
        for (capacity, buckets) in cases {
            assert_eq!(buckets_for_capacity(capacity), buckets, "capacity {}", capacity);
        }
        let s: Store<u64, u64> = (0..100).map(|i| (i, i)).collect();
        let buckets = buckets_for_capacity(s.index.capacity());
        assert!(buckets.is_power_of_two());
        assert!(buckets > s.index.capacity());
        let expected = s.entries.capacity() * mem::size_of::<Entry<u64, u64>>()
            + buckets * mem::size_of::<usize>();
        assert_eq!(s.heap_bytes(false), expected);
        assert_eq!(s.heap_bytes(true), expected + buckets + GROUP_WIDTH);
    }

    #[test]
    fn heap_bytes_grows_with_entries() {
        let empty: Store<u64, u64> = Store::new();
        assert_eq!(empty.heap_bytes(true), 0);
        let s: Store<u64, u64> = (0..32).map(|i| (i, i)).collect();
        assert!(s.heap_bytes(false) >= 32 * 3 * mem::size_of::<u64>());
        assert!(s.heap_bytes(true) > s.heap_bytes(false));
    }
}
