//! Live read-only views over a `FrozenDict`.
//!
//! A view only borrows its map; every call reads the backing store again.

use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::frozen_dict::FrozenDict;
use crate::store;

/// Iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a, K, V> {
    pub(crate) inner: store::Iter<'a, K, V>,
}

/// Iterator over keys in insertion order.
pub struct KeyIter<'a, K, V> {
    pub(crate) inner: store::Iter<'a, K, V>,
}

/// Iterator over values in insertion order.
pub struct ValueIter<'a, K, V> {
    pub(crate) inner: store::Iter<'a, K, V>,
}

macro_rules! impl_iter {
    ($name:ident, $item:ty, |$k:ident, $v:ident| $map:expr) => {
        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map(|($k, $v)| $map)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<'a, K, V> DoubleEndedIterator for $name<'a, K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back().map(|($k, $v)| $map)
            }
        }

        impl<'a, K, V> ExactSizeIterator for $name<'a, K, V> {}
        impl<'a, K, V> FusedIterator for $name<'a, K, V> {}

        impl<'a, K, V> Clone for $name<'a, K, V> {
            fn clone(&self) -> Self {
                Self {
                    inner: self.inner.clone(),
                }
            }
        }
    };
}

impl_iter!(Iter, (&'a K, &'a V), |k, v| (k, v));
impl_iter!(KeyIter, &'a K, |k, _v| k);
impl_iter!(ValueIter, &'a V, |_k, v| v);

/// Set-like view of the keys.
pub struct Keys<'a, K, V> {
    map: &'a FrozenDict<K, V>,
}

/// View of the values.
pub struct Values<'a, K, V> {
    map: &'a FrozenDict<K, V>,
}

/// Set-like view of the `(key, value)` pairs.
pub struct Items<'a, K, V> {
    map: &'a FrozenDict<K, V>,
}

macro_rules! impl_view_common {
    ($view:ident, $iter:ident) => {
        impl<'a, K, V> $view<'a, K, V> {
            pub(crate) fn new(map: &'a FrozenDict<K, V>) -> Self {
                Self { map }
            }

            pub fn len(&self) -> usize {
                self.map.len()
            }

            pub fn is_empty(&self) -> bool {
                self.map.is_empty()
            }

            /// Fresh iterator from the first entry.
            pub fn iter(&self) -> $iter<'a, K, V> {
                $iter {
                    inner: self.map.store().iter(),
                }
            }
        }

        impl<'a, K, V> Clone for $view<'a, K, V> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<'a, K, V> Copy for $view<'a, K, V> {}

        impl<'a, K, V> IntoIterator for $view<'a, K, V> {
            type Item = <$iter<'a, K, V> as Iterator>::Item;
            type IntoIter = $iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, 'b, K, V> IntoIterator for &'b $view<'a, K, V> {
            type Item = <$iter<'a, K, V> as Iterator>::Item;
            type IntoIter = $iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }
    };
}

impl_view_common!(Keys, KeyIter);
impl_view_common!(Values, ValueIter);
impl_view_common!(Items, Iter);

impl<'a, K, V> Keys<'a, K, V>
where
    K: Eq + Hash,
{
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }
}

impl<'a, K, V> Values<'a, K, V>
where
    V: PartialEq,
{
    /// Linear scan; values are not indexed.
    pub fn contains(&self, value: &V) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<'a, K, V> Items<'a, K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.map.get(key).map_or(false, |v| v == value)
    }
}

impl<'a, K: fmt::Debug, V> fmt::Debug for Keys<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Keys(")?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

impl<'a, K, V: fmt::Debug> fmt::Debug for Values<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Values(")?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

impl<'a, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Items<'a, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Items(")?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}
