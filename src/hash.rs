//! Structural hashing for mappings.
//!
//! `TryHash` is a fallible counterpart of `Hash`: shared-mutable containers
//! (`Cell`, `RefCell`, `Mutex`, `RwLock`) and the unhashable `FrozenDict`
//! refuse to hash and report their type. `mapping_hash` is the one formula
//! every mapping uses, so equal mappings of different types hash equally.
//!
//! The formula is an additive set hash:
//! `φ(M) = fmix(Σ (hash(k)·SEED₁ ⊕ hash(v)·SEED₂) ⊕ len·SEED₁ ⊕ EMPTY)`,
//! with wrapping arithmetic, so it does not depend on iteration order.

use core::cell::{Cell, RefCell};
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::{Arc, Mutex, RwLock};

use crate::mapping::{pairs, Mapping};

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Offset so the empty mapping does not hash to zero.
const EMPTY: u64 = 0x243F_6A88_85A3_08D3;

/// Hashing hit a value whose type cannot be hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unhashable {
    type_name: &'static str,
}

impl Unhashable {
    pub fn of<T: ?Sized>() -> Self {
        Self {
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Fully qualified name of the offending type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for Unhashable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unhashable type: '{}'", self.type_name)
    }
}

impl std::error::Error for Unhashable {}

/// Hash a value, or report that it cannot be hashed.
pub trait TryHash {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable>;
}

/// Hash `value` with a fixed-key hasher. Deterministic within and across
/// runs of the same build.
pub fn hash_one<T>(value: &T) -> Result<u64, Unhashable>
where
    T: TryHash + ?Sized,
{
    let mut hasher = DefaultHasher::new();
    value.try_hash(&mut hasher)?;
    Ok(hasher.finish())
}

#[inline]
const fn entry_hash(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}

// murmur3 finalizer
#[inline]
const fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^ (h >> 33)
}

/// Order-independent hash of the set of `(key, value)` pairs of `m`.
///
/// Fails with the first key or value type that cannot be hashed, in the
/// mapping's own iteration order.
pub fn mapping_hash<K, V, M>(m: &M) -> Result<u64, Unhashable>
where
    M: Mapping<K, V> + ?Sized,
    K: TryHash,
    V: TryHash,
{
    let mut sum = 0u64;
    let mut len = 0u64;
    for (k, v) in pairs(m) {
        let kh = hash_one(k)?;
        let vh = hash_one(v)?;
        sum = sum.wrapping_add(entry_hash(kh, vh));
        len += 1;
    }
    Ok(fmix64(sum ^ len.wrapping_mul(SEED_1) ^ EMPTY))
}

macro_rules! impl_try_hash_via_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl TryHash for $t {
                #[inline]
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    self.hash(state);
                    Ok(())
                }
            }
        )*
    };
}

impl_try_hash_via_hash!(
    (), bool, char, str, String, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize,
);

macro_rules! impl_try_hash_float {
    ($($t:ty),*) => {
        $(
            impl TryHash for $t {
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    // 0.0 == -0.0, so they must hash alike
                    let v = if *self == 0.0 { 0.0 } else { *self };
                    v.to_bits().hash(state);
                    Ok(())
                }
            }
        )*
    };
}

impl_try_hash_float!(f32, f64);

macro_rules! impl_try_hash_deref {
    ($($ptr:ident),*) => {
        $(
            impl<T: TryHash + ?Sized> TryHash for $ptr<T> {
                #[inline]
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    (**self).try_hash(state)
                }
            }
        )*
    };
}

impl_try_hash_deref!(Box, Rc, Arc);

impl<T: TryHash + ?Sized> TryHash for &T {
    #[inline]
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }
}

impl<T: TryHash> TryHash for Option<T> {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        match self {
            None => {
                state.write_u8(0);
                Ok(())
            }
            Some(v) => {
                state.write_u8(1);
                v.try_hash(state)
            }
        }
    }
}

impl<T: TryHash> TryHash for [T] {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_usize(self.len());
        self.iter().try_for_each(|v| v.try_hash(state))
    }
}

impl<T: TryHash, const N: usize> TryHash for [T; N] {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        self[..].try_hash(state)
    }
}

impl<T: TryHash> TryHash for Vec<T> {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        self[..].try_hash(state)
    }
}

macro_rules! impl_try_hash_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name: TryHash),+> TryHash for ($($name,)+) {
                #[allow(non_snake_case)]
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    let ($($name,)+) = self;
                    $($name.try_hash(state)?;)+
                    Ok(())
                }
            }
        )*
    };
}

impl_try_hash_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

macro_rules! impl_unhashable {
    ($($cell:ident),*) => {
        $(
            impl<T: ?Sized> TryHash for $cell<T> {
                fn try_hash<H: Hasher>(&self, _state: &mut H) -> Result<(), Unhashable> {
                    Err(Unhashable::of::<Self>())
                }
            }
        )*
    };
}

impl_unhashable!(Cell, RefCell, Mutex, RwLock);

impl<K, V, S> TryHash for HashMap<K, V, S>
where
    K: Eq + Hash + TryHash,
    V: TryHash,
    S: BuildHasher,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_u64(mapping_hash(self)?);
        Ok(())
    }
}

impl<K, V, S> TryHash for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash + TryHash,
    V: TryHash,
    S: BuildHasher,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_u64(mapping_hash(self)?);
        Ok(())
    }
}

impl<K, V> TryHash for BTreeMap<K, V>
where
    K: Ord + TryHash,
    V: TryHash,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_u64(mapping_hash(self)?);
        Ok(())
    }
}
