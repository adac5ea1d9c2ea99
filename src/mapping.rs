//! Mapping: the minimal "mapping-like" capability accepted at the boundary.
//!
//! A mapping-like value exposes its length, lookup by key, and key
//! enumeration. That is all construction, union and equality need from a
//! foreign map type.

use core::hash::{BuildHasher, Hash};
use std::collections::{btree_map, hash_map, BTreeMap, HashMap};

pub trait Mapping<K, V> {
    type Keys<'a>: Iterator<Item = &'a K>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize;

    fn lookup(&self, key: &K) -> Option<&V>;

    fn keys(&self) -> Self::Keys<'_>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pairs of a mapping-like value, in its own key order.
pub(crate) fn pairs<'a, K, V, M>(m: &'a M) -> impl Iterator<Item = (&'a K, &'a V)> + 'a
where
    M: Mapping<K, V> + ?Sized,
    K: 'a,
    V: 'a,
{
    m.keys().filter_map(move |k| m.lookup(k).map(|v| (k, v)))
}

impl<'m, K, V, M> Mapping<K, V> for &'m M
where
    M: Mapping<K, V> + ?Sized,
{
    type Keys<'a> = M::Keys<'a>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        M::len(*self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        M::lookup(*self, key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        M::keys(*self)
    }
}

impl<K, V, S> Mapping<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Keys<'a> = hash_map::Keys<'a, K, V>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        HashMap::keys(self)
    }
}

impl<K, V, S> Mapping<K, V> for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Keys<'a> = hashbrown::hash_map::Keys<'a, K, V>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        hashbrown::HashMap::get(self, key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        hashbrown::HashMap::keys(self)
    }
}

impl<K, V> Mapping<K, V> for BTreeMap<K, V>
where
    K: Ord,
{
    type Keys<'a> = btree_map::Keys<'a, K, V>
    where
        Self: 'a,
        K: 'a;

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn lookup(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn keys(&self) -> Self::Keys<'_> {
        BTreeMap::keys(self)
    }
}

/// Same pairs. Sizes are checked first, then every pair of `a` must be
/// found in `b` with the same value slot or an equal value.
///
/// Identity is per slot: two distinct slots holding clones of one `Rc` are
/// compared with `Rc`'s own `PartialEq`.
pub(crate) fn eq_pairs<K, V, W, A, B>(a: &A, b: &B) -> bool
where
    A: Mapping<K, V> + ?Sized,
    B: Mapping<K, W> + ?Sized,
    V: PartialEq<W>,
{
    a.len() == b.len()
        && pairs(a).all(|(k, v)| b.lookup(k).map_or(false, |w| same_slot(v, w) || *v == *w))
}

#[inline]
fn same_slot<V, W>(v: &V, w: &W) -> bool {
    core::ptr::eq(v as *const V as *const u8, w as *const W as *const u8)
}
