//! HashableFrozenDict: a FrozenDict with a lazily computed, cached hash.
//!
//! The hash cell is the only state written after construction. It moves
//! once from unset to either a hash value or an [`Unhashable`] marker naming
//! the first value type that failed, and never changes again. A `OnceLock`
//! publishes the computed result, so threads racing on the first hash all
//! observe the same outcome.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::Rev;
use core::ops::Index;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::deep_copy::{DeepCopy, Memo};
use crate::error::Error;
use crate::frozen_dict::{fmt_named, FrozenDict};
use crate::hash::{mapping_hash, TryHash, Unhashable};
use crate::mapping::Mapping;
use crate::views::{Items, Iter, KeyIter, Keys, Values};

/// Observable state of the cached hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashState {
    /// Not requested yet.
    Unset,
    Hashable(u64),
    Unhashable(Unhashable),
}

/// A [`FrozenDict`] that is hashable when all its keys and values are.
///
/// Reads, views, equality, display and sizing behave exactly like the
/// wrapped `FrozenDict`. Union and construction produce a new
/// `HashableFrozenDict` with its own, unset hash.
pub struct HashableFrozenDict<K, V> {
    base: FrozenDict<K, V>,
    hash: Arc<OnceLock<Result<u64, Unhashable>>>,
}

impl<K, V> HashableFrozenDict<K, V> {
    fn wrap(base: FrozenDict<K, V>) -> Self {
        Self {
            base,
            hash: Arc::new(OnceLock::new()),
        }
    }

    /// The wrapped base map. Shares the backing store.
    pub fn as_frozen(&self) -> &FrozenDict<K, V> {
        &self.base
    }

    pub fn into_frozen(self) -> FrozenDict<K, V> {
        self.base
    }

    pub fn hash_state(&self) -> HashState {
        match self.hash.get() {
            None => HashState::Unset,
            Some(Ok(h)) => HashState::Hashable(*h),
            Some(Err(u)) => HashState::Unhashable(*u),
        }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.base.iter()
    }

    pub fn reversed(&self) -> Rev<KeyIter<'_, K, V>> {
        self.base.reversed()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.base.keys()
    }

    pub fn values(&self) -> Values<'_, K, V> {
        self.base.values()
    }

    pub fn items(&self) -> Items<'_, K, V> {
        self.base.items()
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.base.first()
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.base.last()
    }

    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.base.get_index(index)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.base.ptr_eq(&other.base)
    }

    pub fn to_pairs(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.base.to_pairs()
    }

    pub fn into_pairs(self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.base.into_pairs()
    }

    /// See [`FrozenDict::estimate_size`]; also counts the hash cell.
    pub fn estimate_size(
        &self,
        include_self_overhead: bool,
        include_backing_store_overhead: bool,
    ) -> usize {
        let cell = core::mem::size_of::<OnceLock<Result<u64, Unhashable>>>();
        let counts = if include_self_overhead {
            2 * core::mem::size_of::<usize>()
        } else {
            0
        };
        self.base
            .estimate_size(include_self_overhead, include_backing_store_overhead)
            + core::mem::size_of::<Arc<()>>()
            + cell
            + counts
    }
}

impl<K, V> HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::wrap(FrozenDict::new())
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::wrap(FrozenDict::from_pairs(pairs))
    }

    pub fn from_mapping<M>(source: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::wrap(FrozenDict::from_mapping(source))
    }

    pub fn with_fields<I, F, N>(source: I, fields: F) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        F: IntoIterator<Item = (N, V)>,
        N: Into<K>,
    {
        Self::wrap(FrozenDict::with_fields(source, fields))
    }

    pub fn from_keys<I>(keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        Self::wrap(FrozenDict::from_keys(keys, value))
    }

    pub fn from_keys_default<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        Self::wrap(FrozenDict::from_keys_default(keys))
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get(key)
    }

    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_or(key, default)
    }

    pub fn get_item<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_item(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.get_key_value(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.base.contains_key(key)
    }

    pub fn union<M>(&self, other: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::wrap(self.base.union(other))
    }

    pub fn reflected_union<M>(&self, other: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::wrap(self.base.reflected_union(other))
    }

    pub fn eq_mapping<M>(&self, other: &M) -> bool
    where
        M: Mapping<K, V> + ?Sized,
        V: PartialEq,
    {
        self.base.eq_mapping(other)
    }

    /// Structural hash of the entries, computed on first use and cached.
    ///
    /// Once a value has been found unhashable, every later call fails with
    /// the same error without scanning the entries again.
    pub fn try_hash(&self) -> Result<u64, Unhashable>
    where
        K: TryHash,
        V: TryHash,
    {
        *self.hash.get_or_init(|| mapping_hash(&self.base))
    }
}

impl<K, V> Clone for HashableFrozenDict<K, V> {
    /// Shallow copy: shares the backing store and the hash cell.
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            hash: Arc::clone(&self.hash),
        }
    }
}

impl<K, V> Default for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashableFrozenDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_named("HashableFrozenDict", self.iter(), f)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Display for HashableFrozenDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl<K, V> From<FrozenDict<K, V>> for HashableFrozenDict<K, V> {
    /// Shares the store of `base`; the hash starts unset.
    fn from(base: FrozenDict<K, V>) -> Self {
        Self::wrap(base)
    }
}

impl<K, V> From<HashableFrozenDict<K, V>> for FrozenDict<K, V> {
    fn from(m: HashableFrozenDict<K, V>) -> Self {
        m.base
    }
}

impl<K, V> FromIterator<(K, V)> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V> From<Vec<(K, V)>> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from_pairs(map)
    }
}

impl<K, V> From<BTreeMap<K, V>> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_pairs(map)
    }
}

impl<'a, K, V> IntoIterator for &'a HashableFrozenDict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, Q, V> Index<&Q> for HashableFrozenDict<K, V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        &self.base[key]
    }
}

impl<K, V> Mapping<K, V> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
{
    type Keys<'a> = KeyIter<'a, K, V>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        self.base.len()
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        self.base.get(key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        self.base.keys().iter()
    }
}

impl<K, V> PartialEq for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<K, V> Eq for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
    V: Eq,
{
}

impl<K, V> PartialEq<FrozenDict<K, V>> for HashableFrozenDict<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &FrozenDict<K, V>) -> bool {
        self.base == *other
    }
}

impl<K, V> PartialEq<HashableFrozenDict<K, V>> for FrozenDict<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &HashableFrozenDict<K, V>) -> bool {
        *self == other.base
    }
}

impl_map_interop!(HashableFrozenDict);

impl<K, V> Hash for HashableFrozenDict<K, V>
where
    K: Eq + Hash + TryHash,
    V: TryHash,
{
    /// Feeds the cached structural hash to `state`.
    ///
    /// # Panics
    ///
    /// Panics with `unhashable type: '<name>'` if a key or value cannot be
    /// hashed. Use [`HashableFrozenDict::try_hash`] to handle that case.
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.try_hash() {
            Ok(h) => state.write_u64(h),
            Err(e) => panic!("{}", e),
        }
    }
}

impl<K, V> TryHash for HashableFrozenDict<K, V>
where
    K: Eq + Hash + TryHash,
    V: TryHash,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_u64(HashableFrozenDict::try_hash(self)?);
        Ok(())
    }
}

impl<K, V> DeepCopy for HashableFrozenDict<K, V>
where
    K: Eq + Hash + Clone + TryHash + 'static,
    V: DeepCopy + TryHash + 'static,
{
    /// Resolves the hash first. A hashable map holds nothing that can
    /// change, so it is returned as is; otherwise the values are deep
    /// copied into a new map with an unset hash.
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        match HashableFrozenDict::try_hash(self) {
            Ok(_) => self.clone(),
            Err(_) => Self::wrap(self.base.deep_copy(memo)),
        }
    }
}
