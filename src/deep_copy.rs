//! Deep copy with a memo table.
//!
//! `Clone` on the frozen maps is a shallow copy that shares the backing
//! store. `DeepCopy` produces a copy that shares nothing mutable with the
//! original. Shared pointers (`Rc`, `Arc`, frozen maps) are recorded in a
//! [`Memo`] by address, so a value reachable twice within one pass is copied
//! once and stays shared inside the copy.
//!
//! Reference cycles are not supported: the memo entry for a pointer is only
//! written after its contents have been copied.

use core::any::{Any, TypeId};
use core::cell::{Cell, RefCell};
use core::hash::{BuildHasher, Hash};
use hashbrown::HashMap;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

/// Copies already made during one deep-copy pass, keyed by source address
/// and type.
#[derive(Default)]
pub struct Memo {
    copies: HashMap<(usize, TypeId), Box<dyn Any>>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Copy previously recorded for the source at `addr`.
    pub fn get<T: Clone + 'static>(&self, addr: usize) -> Option<T> {
        self.copies
            .get(&(addr, TypeId::of::<T>()))
            .and_then(|c| c.downcast_ref::<T>())
            .cloned()
    }

    pub fn insert<T: 'static>(&mut self, addr: usize, copy: T) {
        self.copies.insert((addr, TypeId::of::<T>()), Box::new(copy));
    }
}

pub trait DeepCopy: Sized {
    fn deep_copy(&self, memo: &mut Memo) -> Self;
}

/// Deep copy `value` with a fresh memo.
pub fn deep_copy<T: DeepCopy>(value: &T) -> T {
    value.deep_copy(&mut Memo::new())
}

macro_rules! impl_deep_copy_via_clone {
    ($($t:ty),* $(,)?) => {
        $(
            impl DeepCopy for $t {
                #[inline]
                fn deep_copy(&self, _memo: &mut Memo) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

impl_deep_copy_via_clone!(
    (), bool, char, String, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32,
    f64,
);

impl<'a, T: ?Sized> DeepCopy for &'a T {
    /// The reference itself is kept; nothing behind it is copied.
    #[inline]
    fn deep_copy(&self, _memo: &mut Memo) -> Self {
        *self
    }
}

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        self.as_ref().map(|v| v.deep_copy(memo))
    }
}

impl<T: DeepCopy> DeepCopy for Box<T> {
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        Box::new((**self).deep_copy(memo))
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        self.iter().map(|v| v.deep_copy(memo)).collect()
    }
}

impl<T: Copy> DeepCopy for Cell<T> {
    fn deep_copy(&self, _memo: &mut Memo) -> Self {
        Cell::new(self.get())
    }
}

impl<T: DeepCopy> DeepCopy for RefCell<T> {
    /// # Panics
    ///
    /// Panics if the cell is mutably borrowed.
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        RefCell::new(self.borrow().deep_copy(memo))
    }
}

macro_rules! impl_deep_copy_shared {
    ($($ptr:ident),*) => {
        $(
            impl<T: DeepCopy + 'static> DeepCopy for $ptr<T> {
                fn deep_copy(&self, memo: &mut Memo) -> Self {
                    let addr = $ptr::as_ptr(self) as usize;
                    if let Some(copy) = memo.get::<Self>(addr) {
                        return copy;
                    }
                    let copy = $ptr::new((**self).deep_copy(memo));
                    memo.insert(addr, $ptr::clone(&copy));
                    copy
                }
            }
        )*
    };
}

impl_deep_copy_shared!(Rc, Arc);

macro_rules! impl_deep_copy_tuple {
    ($(($($name:ident),+)),*) => {
        $(
            impl<$($name: DeepCopy),+> DeepCopy for ($($name,)+) {
                #[allow(non_snake_case)]
                fn deep_copy(&self, memo: &mut Memo) -> Self {
                    let ($($name,)+) = self;
                    ($($name.deep_copy(memo),)+)
                }
            }
        )*
    };
}

impl_deep_copy_tuple!((A), (A, B), (A, B, C), (A, B, C, D));

impl<K, V, S> DeepCopy for std::collections::HashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: DeepCopy,
    S: BuildHasher + Clone,
{
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        let mut copy = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (k, v) in self {
            copy.insert(k.clone(), v.deep_copy(memo));
        }
        copy
    }
}

impl<K, V> DeepCopy for BTreeMap<K, V>
where
    K: Clone + Ord,
    V: DeepCopy,
{
    fn deep_copy(&self, memo: &mut Memo) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.deep_copy(memo)))
            .collect()
    }
}
