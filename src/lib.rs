//! # Tessera: Allocation-Lean Open-Addressing Hash Containers
//!
//! This crate provides associative and set containers built on a single
//! open-addressing hash table engine, designed as cache-friendly building
//! blocks with no per-entry allocation.
//!
//! ## Key Features
//!
//! - **One flat slot array**: keys (and values) live co-located in a
//!   power-of-two array; collisions resolve by linear probing
//! - **Tombstone-free removal**: backward shifting closes gaps, so lookup
//!   cost never degrades as entries churn
//! - **Pluggable key strategies**: value keys, filtered/edited string keys,
//!   and extractor-based record keys share the same engine
//! - **Ordered variants**: an insertion-order index layers deterministic
//!   iteration, positional operations, and sorting over the same table
//! - **Safe remove-while-iterating**: mutating cursors stay exact across the
//!   slot shifts their own removals cause
//! - **Hash-flood mitigation**: fixed bit-rotation mixing by default, or a
//!   per-growth rotating multiplier for adversarial workloads
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::{FlatHashMap, FlatHashSet, OrderedHashMap};
//!
//! // Unordered map
//! let mut map = FlatHashMap::new();
//! map.insert("answer", 42);
//! assert_eq!(map.get("answer"), Some(&42));
//!
//! // Unordered set
//! let mut set = FlatHashSet::new();
//! set.insert(5u32);
//! assert!(set.contains(&5));
//!
//! // Insertion-ordered map
//! let mut ordered = OrderedHashMap::new();
//! ordered.insert("b", 2);
//! ordered.insert("a", 1);
//! let keys: Vec<_> = ordered.keys().cloned().collect();
//! assert_eq!(keys, vec!["b", "a"]);
//! ```
//!
//! ## Concurrency
//!
//! Containers carry no internal synchronization: access is serialized by the
//! borrow checker, and instances must be externally synchronized before being
//! shared across threads.

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod error;
pub mod hash_map;

pub use error::{Result, TesseraError};

pub use hash_map::{
    CursorMut, FlatHashMap, FlatHashSet, KeyedHashSet, OrderedHashMap, OrderedHashSet,
    SetCursorMut,
};
pub use hash_map::{DequeOrder, OrderIndex, VecOrder};
pub use hash_map::{FilteredKey, KeyExtract, KeyStrategy, ValueKey};
pub use hash_map::{FloodMitigation, ProbeStats, TableConfig};
