//! Open-addressing hash containers
//!
//! One probe engine backs every variant in this module:
//! - `FlatHashMap` / `FlatHashSet`: unordered map and set
//! - `KeyedHashSet`: records addressed by an extracted key
//! - `OrderedHashMap` / `OrderedHashSet`: insertion-ordered variants layered
//!   over the same engine through an order index
//!
//! All variants share linear probing over a power-of-two slot array,
//! tombstone-free backward-shift removal, doubling growth with configurable
//! hash-flood mitigation, and pluggable key strategies.

mod flat_map;
mod flat_set;
mod hash_functions;
mod key_strategy;
mod keyed_set;
mod order_index;
mod ordered_map;
mod ordered_set;
mod probe_table;
mod slot_array;

pub use flat_map::{CursorMut, FlatHashMap, Iter, Keys, Values, ValuesMut};
pub use flat_set::{FlatHashSet, SetCursorMut, SetIter};
pub use keyed_set::{KeyedHashSet, KeyedIter};
pub use ordered_map::{OrderedHashMap, OrderedIter};
pub use ordered_set::OrderedHashSet;

pub use key_strategy::{FilteredKey, KeyExtract, KeyStrategy, ValueKey};
pub use order_index::{DequeOrder, OrderIndex, VecOrder};
pub use probe_table::{FloodMitigation, ProbeStats, TableConfig};

pub use hash_functions::{
    capacity_for, mix_hash, multiply_mix, optimal_capacity, threshold_for, MIN_CAPACITY,
    MULTIPLIERS,
};
