//! FrozenDict: the immutable, insertion-ordered base map.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::Rev;
use core::mem;
use core::ops::Index;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use crate::deep_copy::{DeepCopy, Memo};
use crate::error::Error;
use crate::hash::{TryHash, Unhashable};
use crate::mapping::{eq_pairs, pairs, Mapping};
use crate::store::Store;
use crate::views::{Items, Iter, KeyIter, Keys, Values};

/// An immutable map that remembers insertion order.
///
/// The backing store is built once and shared behind an `Arc`; `clone` is a
/// shallow copy that returns the same instance (see [`FrozenDict::ptr_eq`]).
/// `FrozenDict` does not implement `Hash`: its values may be mutable
/// through interior mutability. Use
/// [`HashableFrozenDict`](crate::HashableFrozenDict) for a hashable map.
pub struct FrozenDict<K, V> {
    store: Arc<Store<K, V>>,
}

impl<K, V> FrozenDict<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::from_store(Store::new())
    }

    /// Build from `(key, value)` pairs. On a repeated key the last value wins
    /// and the key keeps its first position.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_store(pairs.into_iter().collect())
    }

    /// Copy the entries of any mapping-like value.
    pub fn from_mapping<M>(source: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::from_pairs(pairs(source).map(|(k, v)| (k.clone(), v.clone())))
    }

    /// Build from a positional source, then apply named fields on top of it.
    /// A field overrides a source entry with the same key.
    pub fn with_fields<I, F, N>(source: I, fields: F) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: IntoIterator<Item = (N, V)>,
        N: Into<K>,
    {
        let fields = fields.into_iter().map(|(n, v)| (n.into(), v));
        Self::from_pairs(source.into_iter().chain(fields))
    }

    /// One entry per distinct key, every value a clone of `value`.
    pub fn from_keys<I>(keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        Self::from_pairs(keys.into_iter().map(|k| (k, value.clone())))
    }

    /// One entry per distinct key, every value `V::default()`.
    pub fn from_keys_default<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        Self::from_pairs(keys.into_iter().map(|k| (k, V::default())))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(key)
    }

    /// Value for `key`, or `default` when the key is absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(key).unwrap_or(default)
    }

    /// Value for `key`, failing with [`Error::MissingKey`] when absent.
    pub fn get_item<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get(key).ok_or(Error::MissingKey)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.get_key_value(key)
    }

    /// Membership test by key.
    ///
    /// The probe must be hashable; a probe that cannot hash is rejected at
    /// compile time rather than reported as absent:
    ///
    /// ```compile_fail
    /// use frozen_dict::FrozenDict;
    /// use std::cell::RefCell;
    ///
    /// let m: FrozenDict<i32, i32> = FrozenDict::from_pairs([(1, 1)]);
    /// m.contains_key(&RefCell::new(1));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains_key(key)
    }

    /// New map with this map's entries followed by `other`'s; `other` wins
    /// on shared keys.
    pub fn union<M>(&self, other: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::from_pairs(
            self.iter()
                .chain(pairs(other))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// New map with `other`'s entries followed by this map's; this map wins
    /// on shared keys.
    pub fn reflected_union<M>(&self, other: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::from_pairs(
            pairs(other)
                .chain(self.iter())
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// True when `other` holds exactly the same pairs, in any order.
    ///
    /// A value is matched first by identity of its slot, then by `==`. So a
    /// map compared with itself is equal even when a value is not equal to
    /// itself (a NaN), while two maps holding separate `Rc` clones of such a
    /// value are not.
    pub fn eq_mapping<M>(&self, other: &M) -> bool
    where
        M: Mapping<K, V> + ?Sized,
        V: PartialEq,
    {
        eq_pairs(self, other)
    }
}

impl<K, V> FrozenDict<K, V> {
    pub(crate) fn from_store(store: Store<K, V>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub(crate) fn store(&self) -> &Store<K, V> {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.store.iter(),
        }
    }

    /// Keys in reverse insertion order.
    pub fn reversed(&self) -> Rev<KeyIter<'_, K, V>> {
        self.keys().iter().rev()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self)
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self)
    }

    pub fn items(&self) -> Items<'_, K, V> {
        Items::new(self)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.store.first()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.store.last()
    }

    /// Entry at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.store.get_index(index)
    }

    /// True when both handles share one backing store, i.e. one is a
    /// shallow copy of the other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Entries in insertion order; enough to rebuild an equal map with
    /// [`FrozenDict::from_pairs`].
    pub fn to_pairs(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Like [`FrozenDict::to_pairs`], moving the entries out when this is the
    /// only handle to the backing store.
    pub fn into_pairs(self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.into_pairs(),
            Err(shared) => Self { store: shared }.to_pairs(),
        }
    }

    /// Approximate number of bytes used by this map.
    ///
    /// Always counts the handle, the store header and the heap buffers of
    /// the store. `include_self_overhead` adds the reference counts of the
    /// shared allocation; `include_backing_store_overhead` adds the control
    /// bytes of the hash index.
    pub fn estimate_size(
        &self,
        include_self_overhead: bool,
        include_backing_store_overhead: bool,
    ) -> usize {
        let mut size = mem::size_of::<Self>() + mem::size_of::<Store<K, V>>();
        if include_self_overhead {
            size += 2 * mem::size_of::<usize>();
        }
        size + self.store.heap_bytes(include_backing_store_overhead)
    }
}

/// Shared by the `Debug` impls: `Name()` when empty, else `Name({k: v, ..})`.
pub(crate) fn fmt_named<'a, K, V, I>(name: &str, iter: I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    K: fmt::Debug + 'a,
    V: fmt::Debug + 'a,
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
{
    if iter.len() == 0 {
        return write!(f, "{}()", name);
    }
    write!(f, "{}(", name)?;
    f.debug_map().entries(iter).finish()?;
    f.write_str(")")
}

impl<K, V> Clone for FrozenDict<K, V> {
    /// Shallow copy: the clone shares the backing store.
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<K, V> Default for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for FrozenDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_named("FrozenDict", self.iter(), f)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for FrozenDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<K, V> FromIterator<(K, V)> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V> From<Vec<(K, V)>> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from_pairs(map)
    }
}

impl<K, V, S> From<hashbrown::HashMap<K, V, S>> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(map: hashbrown::HashMap<K, V, S>) -> Self {
        Self::from_pairs(map)
    }
}

impl<K, V> From<BTreeMap<K, V>> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_pairs(map)
    }
}

impl<'a, K, V> IntoIterator for &'a FrozenDict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, Q, V> Index<&Q> for FrozenDict<K, V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found"),
        }
    }
}

impl<K, V> Mapping<K, V> for FrozenDict<K, V>
where
    K: Eq + Hash,
{
    type Keys<'a> = KeyIter<'a, K, V>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        FrozenDict::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        FrozenDict::get(self, key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        FrozenDict::keys(self).iter()
    }
}

impl<K, V> PartialEq for FrozenDict<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.eq_mapping(other)
    }
}

impl<K, V> Eq for FrozenDict<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl_map_interop!(FrozenDict);

impl<K, V> TryHash for FrozenDict<K, V> {
    /// Always fails: the base map is unhashable.
    fn try_hash<H: Hasher>(&self, _state: &mut H) -> Result<(), Unhashable> {
        Err(Unhashable::of::<Self>())
    }
}

impl<K, V> DeepCopy for FrozenDict<K, V>
where
    K: Clone + 'static,
    V: DeepCopy + 'static,
{
    /// Always builds a new map from deep copies of the values. Two handles
    /// to one store reached within the same pass share one copy.
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        let addr = Arc::as_ptr(&self.store) as usize;
        if let Some(copy) = memo.get::<Self>(addr) {
            return copy;
        }
        let copy = Self::from_store(self.store.map_values(|v| v.deep_copy(memo)));
        memo.insert(addr, copy.clone());
        copy
    }
}
