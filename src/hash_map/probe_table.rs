//! Core open-addressing engine shared by every container variant
//!
//! The engine is deliberately mechanical: it stores opaque elements, probes
//! linearly from a masked slot index, and leaves all key semantics to the
//! closures its callers derive from their [`KeyStrategy`]. Removal is
//! tombstone-free - the gap left by a departing element is closed by shifting
//! later cluster members backward, so a probe can always prove absence by
//! reaching an empty slot.
//!
//! [`KeyStrategy`]: crate::hash_map::key_strategy::KeyStrategy

use crate::error::{check_load_factor, Result, TesseraError};
use crate::hash_map::hash_functions::{
    capacity_for, mix_hash, multiply_mix, optimal_capacity, threshold_for, MULTIPLIERS,
};
use crate::hash_map::slot_array::SlotArray;

/// Hash-flood mitigation applied between a key's native hash and placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloodMitigation {
    /// Stateless bit-rotation mix; placement never changes across growths
    #[default]
    FixedMix,
    /// Multiply by a per-instance odd constant, rotated on every growth, so
    /// a key sequence tuned against one table generation scatters in the next
    RotatingMultiplier,
}

/// Construction parameters shared by every container variant
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Requested slot count; rounded up to a power of two
    pub initial_capacity: usize,
    /// Occupancy ratio that triggers growth, in (0, 1]
    pub load_factor: f64,
    /// Placement mixing strategy
    pub mitigation: FloodMitigation,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            initial_capacity: 16,
            load_factor: 0.75,
            mitigation: FloodMitigation::FixedMix,
        }
    }
}

impl TableConfig {
    /// Config for containers expected to stay small: minimal footprint,
    /// higher occupancy before growth
    pub fn compact() -> Self {
        TableConfig {
            initial_capacity: 4,
            load_factor: 0.9,
            ..TableConfig::default()
        }
    }

    /// Config for adversarially chosen key sequences: placement constants
    /// rotate on every growth
    pub fn adversarial() -> Self {
        TableConfig {
            mitigation: FloodMitigation::RotatingMultiplier,
            ..TableConfig::default()
        }
    }

    /// Reject invalid parameters before any allocation
    pub fn validate(&self) -> Result<()> {
        check_load_factor(self.load_factor)
    }
}

/// Probe-distance statistics, computed on demand
#[derive(Debug, Default, Clone)]
pub struct ProbeStats {
    /// Mean distance between an element's slot and its ideal slot
    pub average_probe_distance: f64,
    /// Longest such distance
    pub max_probe_distance: usize,
    /// Live element count the statistics cover
    pub entries: usize,
}

/// Outcome of a [`ProbeTable::locate`] probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotFind {
    /// The matching element's slot
    Found(usize),
    /// The empty slot where an insert of this key would land
    Vacant(usize),
}

/// Open-addressing table of opaque elements
///
/// Callers supply `hash_of` closures wherever the engine must re-derive an
/// element's placement (removal shifts, growth); the engine itself never
/// inspects element contents.
pub(crate) struct ProbeTable<E> {
    slots: SlotArray<E>,
    len: usize,
    threshold: usize,
    load_factor: f64,
    mitigation: FloodMitigation,
    multiplier_index: usize,
}

impl<E> ProbeTable<E> {
    pub fn with_config(config: &TableConfig) -> Result<Self> {
        config.validate()?;
        let capacity = optimal_capacity(config.initial_capacity);
        Ok(ProbeTable {
            slots: SlotArray::new(capacity),
            len: 0,
            threshold: threshold_for(capacity, config.load_factor),
            load_factor: config.load_factor,
            mitigation: config.mitigation,
            multiplier_index: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    #[inline]
    fn mask(&self) -> usize {
        self.capacity() - 1
    }

    /// Ideal slot for a native hash under the current mitigation state
    #[inline]
    pub fn place(&self, raw_hash: u64) -> usize {
        let mixed = match self.mitigation {
            FloodMitigation::FixedMix => mix_hash(raw_hash),
            FloodMitigation::RotatingMultiplier => {
                multiply_mix(raw_hash, MULTIPLIERS[self.multiplier_index])
            }
        };
        mixed as usize & self.mask()
    }

    /// Slot index of the element matching `matches`, probing from `raw_hash`
    pub fn find(&self, raw_hash: u64, matches: impl Fn(&E) -> bool) -> Option<usize> {
        match self.locate(raw_hash, matches) {
            SlotFind::Found(index) => Some(index),
            SlotFind::Vacant(_) => None,
        }
    }

    /// Probe for the element matching `matches`; on a miss, report the empty
    /// slot where an insert would land
    pub fn locate(&self, raw_hash: u64, matches: impl Fn(&E) -> bool) -> SlotFind {
        let mask = self.mask();
        let mut index = self.place(raw_hash);
        loop {
            if !self.slots.is_occupied(index) {
                return SlotFind::Vacant(index);
            }
            if matches(self.slots.slot(index)) {
                return SlotFind::Found(index);
            }
            index = (index + 1) & mask;
        }
    }

    /// Write `element` into the vacant slot a [`locate`] miss reported
    ///
    /// Growth fires after the count increases and completes before return,
    /// so the written slot index must not be relied on afterwards.
    ///
    /// [`locate`]: ProbeTable::locate
    pub fn occupy(&mut self, index: usize, element: E, hash_of: impl Fn(&E) -> u64) {
        self.slots.write(index, element);
        self.len += 1;
        if self.len >= self.threshold {
            self.resize_to(self.capacity() * 2, &hash_of);
        }
    }

    /// Insert an element known to be absent, probing from `raw_hash`
    pub fn insert_unique(&mut self, raw_hash: u64, element: E, hash_of: impl Fn(&E) -> u64) {
        let mask = self.mask();
        let mut index = self.place(raw_hash);
        while self.slots.is_occupied(index) {
            index = (index + 1) & mask;
        }
        self.occupy(index, element, hash_of);
    }

    /// Remove and return the element `matches` accepts, if present
    pub fn remove(
        &mut self,
        raw_hash: u64,
        matches: impl Fn(&E) -> bool,
        hash_of: impl Fn(&E) -> u64,
    ) -> Option<E> {
        let index = self.find(raw_hash, matches)?;
        Some(self.remove_slot(index, hash_of))
    }

    /// Remove the element at `index`, closing the gap by backward shifting
    pub fn remove_slot(&mut self, index: usize, hash_of: impl Fn(&E) -> u64) -> E {
        self.remove_slot_observed(index, hash_of, |_, _| {})
    }

    /// Backward-shift removal reporting every relocation to `on_move`
    ///
    /// `on_move(from, to)` fires for each cluster member shifted into the
    /// gap; mutating cursors use it to keep their visit bookkeeping exact.
    pub fn remove_slot_observed(
        &mut self,
        index: usize,
        hash_of: impl Fn(&E) -> u64,
        mut on_move: impl FnMut(usize, usize),
    ) -> E {
        debug_assert!(self.slots.is_occupied(index));
        let removed = self.slots.take(index);
        self.len -= 1;

        let mask = self.mask();
        let mut gap = index;
        let mut cursor = (index + 1) & mask;
        loop {
            if !self.slots.is_occupied(cursor) {
                break;
            }
            let home = self.place(hash_of(self.slots.slot(cursor)));
            // The element can move iff the gap lies cyclically in [home, cursor):
            // a probe starting at its ideal slot would still reach it there.
            let reachable = if home <= cursor {
                gap >= home && gap < cursor
            } else {
                gap >= home || gap < cursor
            };
            if reachable {
                self.slots.relocate(cursor, gap);
                on_move(cursor, gap);
                gap = cursor;
            }
            cursor = (cursor + 1) & mask;
        }
        removed
    }

    /// Reallocate at `new_capacity` (a power of two) and reinsert every element
    ///
    /// Reinsertion skips duplicate checks: every live element is already
    /// unique under the caller's strategy.
    fn resize_to(&mut self, new_capacity: usize, hash_of: &impl Fn(&E) -> u64) {
        debug_assert!(new_capacity.is_power_of_two());
        debug_assert!(threshold_for(new_capacity, self.load_factor) >= self.len);
        if new_capacity > self.capacity()
            && self.mitigation == FloodMitigation::RotatingMultiplier
        {
            self.multiplier_index = (self.multiplier_index + 1) % MULTIPLIERS.len();
        }

        let mut old = std::mem::replace(&mut self.slots, SlotArray::new(new_capacity));
        self.threshold = threshold_for(new_capacity, self.load_factor);
        let mask = new_capacity - 1;

        let mut next = old.next_occupied(0);
        while let Some(i) = next {
            let element = old.take(i);
            let mut index = self.place(hash_of(&element));
            while self.slots.is_occupied(index) {
                index = (index + 1) & mask;
            }
            self.slots.write(index, element);
            next = old.next_occupied(i + 1);
        }
    }

    /// Pre-grow so `additional` more inserts cannot trigger a rehash
    pub fn reserve(&mut self, additional: usize, hash_of: impl Fn(&E) -> u64) {
        let needed = self
            .len
            .checked_add(additional)
            .expect("capacity overflow in reserve");
        if needed >= self.threshold {
            self.resize_to(capacity_for(needed + 1, self.load_factor), &hash_of);
        }
    }

    /// Shrink toward `max_capacity`, never below what the live count requires
    pub fn shrink_to(&mut self, max_capacity: usize, hash_of: impl Fn(&E) -> u64) {
        let floor = capacity_for(self.len, self.load_factor);
        let target = optimal_capacity(max_capacity).max(floor);
        if target < self.capacity() {
            self.resize_to(target, &hash_of);
        }
    }

    /// Drop every element; capacity is retained
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Drop every element and reallocate sized for `expected` future entries
    pub fn clear_with_capacity(&mut self, expected: usize) {
        let capacity = capacity_for(expected, self.load_factor);
        self.slots = SlotArray::new(capacity);
        self.threshold = threshold_for(capacity, self.load_factor);
        self.len = 0;
    }

    /// Swap mitigation state; only legal while empty
    pub fn set_mitigation(&mut self, mitigation: FloodMitigation) -> Result<()> {
        if self.len != 0 {
            return Err(TesseraError::not_empty("set_mitigation"));
        }
        self.mitigation = mitigation;
        self.multiplier_index = 0;
        Ok(())
    }

    /// First occupied slot at or after `start`
    #[inline]
    pub fn next_occupied(&self, start: usize) -> Option<usize> {
        self.slots.next_occupied(start)
    }

    #[inline]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.slots.is_occupied(index)
    }

    #[inline]
    pub fn slot(&self, index: usize) -> &E {
        self.slots.slot(index)
    }

    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> &mut E {
        self.slots.slot_mut(index)
    }

    /// Replace the element at an occupied slot, returning the old one
    #[inline]
    pub fn replace_slot(&mut self, index: usize, element: E) -> E {
        self.slots.replace(index, element)
    }

    /// Probe-distance statistics over the current layout
    pub fn probe_stats(&self, hash_of: impl Fn(&E) -> u64) -> ProbeStats {
        let mask = self.mask();
        let mut total = 0usize;
        let mut max = 0usize;
        let mut next = self.slots.next_occupied(0);
        while let Some(i) = next {
            let home = self.place(hash_of(self.slots.slot(i)));
            let distance = i.wrapping_sub(home) & mask;
            total += distance;
            max = max.max(distance);
            next = self.slots.next_occupied(i + 1);
        }
        ProbeStats {
            average_probe_distance: if self.len == 0 {
                0.0
            } else {
                total as f64 / self.len as f64
            },
            max_probe_distance: max,
            entries: self.len,
        }
    }
}

/// Slot-level traversal state shared by every container's mutating cursor
///
/// The cursor sweeps the slot array once, then drains entries that
/// backward-shift removals relocated behind the sweep. Bookkeeping:
///
/// - `pending`: slots holding not-yet-visited entries that a shift moved
///   into already-swept territory; drained after the main sweep.
/// - `skip`: slots holding already-visited entries that a shift moved (via
///   wraparound) ahead of the sweep; passed over without yielding.
///
/// Together they guarantee each live entry is yielded exactly once no matter
/// how many interleaved `remove` calls reshape the clusters.
pub(crate) struct RawCursor {
    index: usize,
    last: Option<usize>,
    pending: Vec<usize>,
    pending_pos: usize,
    skip: Vec<usize>,
}

impl RawCursor {
    pub fn new() -> Self {
        RawCursor {
            index: 0,
            last: None,
            pending: Vec::new(),
            pending_pos: 0,
            skip: Vec::new(),
        }
    }

    /// Slot of the next unvisited entry, or `None` when traversal is complete
    pub fn advance<E>(&mut self, table: &ProbeTable<E>) -> Option<usize> {
        while let Some(i) = table.next_occupied(self.index) {
            self.index = i + 1;
            if let Some(p) = self.skip.iter().position(|&s| s == i) {
                self.skip.swap_remove(p);
                continue;
            }
            self.last = Some(i);
            return Some(i);
        }
        // Main sweep complete: everything at or above `index` is empty, so
        // pin the visited boundary at capacity before draining `pending`.
        self.index = table.capacity();
        while self.pending_pos < self.pending.len() {
            let i = self.pending[self.pending_pos];
            self.pending_pos += 1;
            if table.is_occupied(i) {
                self.last = Some(i);
                return Some(i);
            }
        }
        None
    }

    /// Remove the most recently yielded entry, repairing the visit sets for
    /// every relocation the backward shift performs
    ///
    /// # Panics
    /// Panics if called before the first `advance`, or twice for one entry.
    pub fn remove<E>(&mut self, table: &mut ProbeTable<E>, hash_of: impl Fn(&E) -> u64) -> E {
        let slot = self
            .last
            .take()
            .expect("cursor remove() called before advance()");
        let idx = self.index;
        let ppos = self.pending_pos;
        let pending = &mut self.pending;
        let skip = &mut self.skip;
        table.remove_slot_observed(slot, hash_of, |from, to| {
            if let Some(p) = pending[ppos..].iter().position(|&s| s == from) {
                if to >= idx {
                    // Back in unswept territory; the main sweep will find it.
                    pending.remove(ppos + p);
                } else {
                    pending[ppos + p] = to;
                }
            } else if let Some(p) = skip.iter().position(|&s| s == from) {
                if to >= idx {
                    skip[p] = to;
                } else {
                    // A visited entry settled behind the sweep; it can no
                    // longer be re-encountered.
                    skip.swap_remove(p);
                }
            } else if from >= idx && to < idx {
                pending.push(to);
            } else if from < idx && to >= idx {
                skip.push(to);
            }
        })
    }
}

impl<E: Clone> Clone for ProbeTable<E> {
    fn clone(&self) -> Self {
        ProbeTable {
            slots: self.slots.clone(),
            len: self.len,
            threshold: self.threshold,
            load_factor: self.load_factor,
            mitigation: self.mitigation,
            multiplier_index: self.multiplier_index,
        }
    }
}
