/// Build a [`FrozenDict`](crate::FrozenDict).
///
/// ```
/// use frozen_dict::frozendict;
///
/// let empty: frozen_dict::FrozenDict<&str, i32> = frozendict! {};
/// let pairs = frozendict! { "a" => 1, "b" => 2 };
/// let fields: frozen_dict::FrozenDict<String, i32> = frozendict! { a = 1, b = 2 };
/// let merged = frozendict! { [("a", 1), ("c", 3)]; a = 2 };
///
/// assert!(empty.is_empty());
/// assert_eq!(pairs["b"], 2);
/// assert_eq!(fields["a"], 1);
/// assert_eq!(merged["a"], 2);
/// ```
#[macro_export]
macro_rules! frozendict {
    () => {
        $crate::FrozenDict::new()
    };
    ($($field:ident = $value:expr),+ $(,)?) => {
        $crate::FrozenDict::with_fields(
            ::core::iter::empty(),
            [$((::core::stringify!($field), $value)),+],
        )
    };
    ($source:expr; $($field:ident = $value:expr),+ $(,)?) => {
        $crate::FrozenDict::with_fields($source, [$((::core::stringify!($field), $value)),+])
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::FrozenDict::from_pairs([$(($key, $value)),+])
    };
}

/// Build a [`HashableFrozenDict`](crate::HashableFrozenDict). Accepts the
/// same forms as [`frozendict!`].
///
/// ```
/// use frozen_dict::hashable_frozendict;
///
/// let m = hashable_frozendict! { "one" => 1, "two" => 2 };
/// assert!(m.try_hash().is_ok());
/// ```
#[macro_export]
macro_rules! hashable_frozendict {
    () => {
        $crate::HashableFrozenDict::new()
    };
    ($($field:ident = $value:expr),+ $(,)?) => {
        $crate::HashableFrozenDict::with_fields(
            ::core::iter::empty(),
            [$((::core::stringify!($field), $value)),+],
        )
    };
    ($source:expr; $($field:ident = $value:expr),+ $(,)?) => {
        $crate::HashableFrozenDict::with_fields($source, [$((::core::stringify!($field), $value)),+])
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::HashableFrozenDict::from_pairs([$(($key, $value)),+])
    };
}

// Equality with, and reflected union from, the std and hashbrown map types.
// `$frozen` must provide `eq_mapping` and `reflected_union`.
macro_rules! impl_map_interop {
    ($frozen:ident) => {
        impl<K, V, S> PartialEq<::std::collections::HashMap<K, V, S>> for $frozen<K, V>
        where
            K: Eq + ::core::hash::Hash,
            V: PartialEq,
            S: ::core::hash::BuildHasher,
        {
            fn eq(&self, other: &::std::collections::HashMap<K, V, S>) -> bool {
                self.eq_mapping(other)
            }
        }

        impl<K, V, S> PartialEq<$frozen<K, V>> for ::std::collections::HashMap<K, V, S>
        where
            K: Eq + ::core::hash::Hash,
            V: PartialEq,
            S: ::core::hash::BuildHasher,
        {
            fn eq(&self, other: &$frozen<K, V>) -> bool {
                other.eq_mapping(self)
            }
        }

        impl<K, V, S> PartialEq<::hashbrown::HashMap<K, V, S>> for $frozen<K, V>
        where
            K: Eq + ::core::hash::Hash,
            V: PartialEq,
            S: ::core::hash::BuildHasher,
        {
            fn eq(&self, other: &::hashbrown::HashMap<K, V, S>) -> bool {
                self.eq_mapping(other)
            }
        }

        impl<K, V, S> PartialEq<$frozen<K, V>> for ::hashbrown::HashMap<K, V, S>
        where
            K: Eq + ::core::hash::Hash,
            V: PartialEq,
            S: ::core::hash::BuildHasher,
        {
            fn eq(&self, other: &$frozen<K, V>) -> bool {
                other.eq_mapping(self)
            }
        }

        impl<K, V> PartialEq<::std::collections::BTreeMap<K, V>> for $frozen<K, V>
        where
            K: Ord + ::core::hash::Hash,
            V: PartialEq,
        {
            fn eq(&self, other: &::std::collections::BTreeMap<K, V>) -> bool {
                self.eq_mapping(other)
            }
        }

        impl<K, V> PartialEq<$frozen<K, V>> for ::std::collections::BTreeMap<K, V>
        where
            K: Ord + ::core::hash::Hash,
            V: PartialEq,
        {
            fn eq(&self, other: &$frozen<K, V>) -> bool {
                other.eq_mapping(self)
            }
        }

        impl<K, V, M> ::core::ops::BitOr<&M> for &$frozen<K, V>
        where
            K: Eq + ::core::hash::Hash + Clone,
            V: Clone,
            M: $crate::Mapping<K, V> + ?Sized,
        {
            type Output = $frozen<K, V>;

            fn bitor(self, other: &M) -> $frozen<K, V> {
                self.union(other)
            }
        }

        impl<K, V, S> ::core::ops::BitOr<&$frozen<K, V>> for &::std::collections::HashMap<K, V, S>
        where
            K: Eq + ::core::hash::Hash + Clone,
            V: Clone,
            S: ::core::hash::BuildHasher,
        {
            type Output = $frozen<K, V>;

            fn bitor(self, other: &$frozen<K, V>) -> $frozen<K, V> {
                other.reflected_union(self)
            }
        }

        impl<K, V, S> ::core::ops::BitOr<&$frozen<K, V>> for &::hashbrown::HashMap<K, V, S>
        where
            K: Eq + ::core::hash::Hash + Clone,
            V: Clone,
            S: ::core::hash::BuildHasher,
        {
            type Output = $frozen<K, V>;

            fn bitor(self, other: &$frozen<K, V>) -> $frozen<K, V> {
                other.reflected_union(self)
            }
        }

        impl<K, V> ::core::ops::BitOr<&$frozen<K, V>> for &::std::collections::BTreeMap<K, V>
        where
            K: Ord + ::core::hash::Hash + Clone,
            V: Clone,
        {
            type Output = $frozen<K, V>;

            fn bitor(self, other: &$frozen<K, V>) -> $frozen<K, V> {
                other.reflected_union(self)
            }
        }
    };
}
