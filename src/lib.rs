//! frozen-dict: immutable, insertion-ordered maps with an optional cached
//! structural hash.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a value-semantics map that is built once and never mutated,
//!   compares equal to any map with the same pairs, and can itself be a
//!   map key or set member when its contents allow it.
//! - Layers:
//!   - Store<K, V>: insertion-ordered entries in a `Vec`, indexed by a
//!     `hashbrown::HashTable` of positions. Each entry keeps its `u64`
//!     hash so the index never rehashes through `K: Hash`.
//!   - FrozenDict<K, V>: public read-only map over an `Arc<Store>`.
//!     Unhashable on purpose, since values may carry interior mutability.
//!   - HashableFrozenDict<K, V>: a FrozenDict plus a `OnceLock` caching
//!     either the structural hash or the first unhashable type found.
//!
//! Hashing
//! - `mapping_hash` is the single formula for hashing any mapping. It sums
//!   per-pair contributions, so it is independent of insertion order and
//!   of the concrete map type: a HashableFrozenDict, a `HashMap` and a
//!   `BTreeMap` with equal pairs hash equally.
//! - Hashability is decided at run time through `TryHash`. Cells, locks and
//!   the base FrozenDict report `Unhashable` with their type name.
//!
//! Copying
//! - `Clone` is a shallow copy and shares the backing store, so a clone is
//!   the same instance (`ptr_eq`).
//! - `DeepCopy` with a `Memo` copies values. A FrozenDict always rebuilds;
//!   a HashableFrozenDict whose hash resolves is returned unchanged, since
//!   nothing reachable from it can change.
//!
//! Mapping-like inputs
//! - The `Mapping` trait (length, lookup, key enumeration) is the only
//!   capability required from foreign maps in construction, union and
//!   equality. It is implemented for std `HashMap`/`BTreeMap`,
//!   `hashbrown::HashMap` and both frozen types.
//!
//! Concurrency
//! - Both types are `Send + Sync` when `K` and `V` are. The hash cell is
//!   the only state written after construction; racing first hashes
//!   publish one complete result.
//!
//! Notes and non-goals
//! - No mutation API of any kind, no `insert`/`remove`.
//! - Keys must be `Hash + Eq`; a probe key that cannot hash does not
//!   type-check.
//! - Reference cycles through `Rc`/`Arc` are not supported by `DeepCopy`.

#[macro_use]
mod macros;

mod deep_copy;
mod error;
mod frozen_dict;
mod hash;
mod hashable;
mod mapping;
#[cfg(feature = "serde")]
mod serde_impl;
mod store;
mod store_proptest;
mod views;

// Public surface
pub use deep_copy::{deep_copy, DeepCopy, Memo};
pub use error::Error;
pub use frozen_dict::FrozenDict;
pub use hash::{hash_one, mapping_hash, TryHash, Unhashable};
pub use hashable::{HashState, HashableFrozenDict};
pub use mapping::Mapping;
pub use views::{Items, Iter, KeyIter, Keys, ValueIter, Values};
