//! OrderedHashMap - insertion-ordered hash map
//!
//! A thin order layer over the same probe engine: every live key is mirrored
//! in an [`OrderIndex`], so iteration follows insertion (or caller-arranged)
//! order while membership stays O(1). Slot positions and order positions are
//! independent - resolving an ordered position to an entry re-derives the
//! key's placement through the strategy.

use crate::error::{check_index, Result, TesseraError};
use crate::hash_map::key_strategy::{KeyStrategy, ValueKey};
use crate::hash_map::order_index::{OrderIndex, VecOrder};
use crate::hash_map::probe_table::{
    FloodMitigation, ProbeStats, ProbeTable, SlotFind, TableConfig,
};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Hash map with a deterministic iteration order
///
/// Keys must be `Clone`: the order index stores its own copy of each key.
///
/// # Examples
///
/// ```rust
/// use tessera::OrderedHashMap;
///
/// let mut map = OrderedHashMap::new();
/// map.insert("b", 2);
/// map.insert("a", 1);
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["b", "a"]);
/// ```
pub struct OrderedHashMap<K, V, O = VecOrder<K>, S = ValueKey> {
    table: ProbeTable<(K, V)>,
    order: O,
    strategy: S,
}

impl<K, V> OrderedHashMap<K, V, VecOrder<K>, ValueKey> {
    /// Create an empty map with default configuration
    pub fn new() -> Self {
        Self::with_strategy(ValueKey::new())
    }

    /// Create an empty map sized for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config_and_strategy(
            TableConfig {
                initial_capacity: capacity,
                ..TableConfig::default()
            },
            ValueKey::new(),
        )
    }

    /// Create an empty map from explicit configuration
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_strategy(config, ValueKey::new())
    }
}

impl<K, V, O, S> OrderedHashMap<K, V, O, S>
where
    O: OrderIndex<K> + Default,
{
    /// Create an empty map bound to `strategy`
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(TableConfig::default(), strategy)
            .expect("default config is valid")
    }

    /// Create an empty map from explicit configuration and strategy
    pub fn with_config_and_strategy(config: TableConfig, strategy: S) -> Result<Self> {
        Ok(OrderedHashMap {
            table: ProbeTable::with_config(&config)?,
            order: O::default(),
            strategy,
        })
    }
}

impl<K, V, O, S> OrderedHashMap<K, V, O, S>
where
    O: OrderIndex<K>,
{
    /// Number of live entries
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the map holds no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Current slot count (always a power of two)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Configured growth-trigger occupancy ratio
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// The strategy this map consults for hashing and equality
    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Swap in a new strategy value; only legal while the map is empty
    pub fn replace_strategy(&mut self, strategy: S) -> Result<S> {
        if !self.is_empty() {
            return Err(TesseraError::not_empty("replace_strategy"));
        }
        Ok(std::mem::replace(&mut self.strategy, strategy))
    }

    /// Swap the hash-flood mitigation mode; only legal while empty
    pub fn set_mitigation(&mut self, mitigation: FloodMitigation) -> Result<()> {
        self.table.set_mitigation(mitigation)
    }

    /// Drop every entry, keeping the current capacity
    pub fn clear(&mut self) {
        self.table.clear();
        self.order.clear();
    }

    /// Drop every entry and reallocate sized for `expected` future entries
    pub fn clear_with_capacity(&mut self, expected: usize) {
        self.table.clear_with_capacity(expected);
        self.order.clear();
    }

    /// Iterate over `(&K, &V)` entries in order
    pub fn iter(&self) -> OrderedIter<'_, K, V, O, S> {
        OrderedIter { map: self, pos: 0 }
    }

    /// Iterate over keys in order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        (0..self.order.len()).map(|pos| self.order.get(pos))
    }
}

impl<K, V, O, S> OrderedHashMap<K, V, O, S>
where
    K: Clone,
    O: OrderIndex<K>,
    S: KeyStrategy<K>,
{
    #[inline]
    fn hash_entry(strategy: &S, entry: &(K, V)) -> u64 {
        strategy.hash_key(&entry.0)
    }

    /// Insert a key-value pair, returning the previous value for this key
    ///
    /// A new key is appended at the end of the order; re-insertion overwrites
    /// the value and leaves the key's position untouched.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let raw = self.strategy.hash_key(&key);
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        match table.locate(raw, |e| strategy.equate(&e.0, &key)) {
            SlotFind::Found(i) => Some(std::mem::replace(&mut table.slot_mut(i).1, value)),
            SlotFind::Vacant(i) => {
                order.push(key.clone());
                table.occupy(i, (key, value), |e| Self::hash_entry(strategy, e));
                None
            }
        }
    }

    /// Insert only if the key is absent; returns whether an insert happened
    ///
    /// A new key is appended at the end of the order.
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        let raw = self.strategy.hash_key(&key);
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        match table.locate(raw, |e| strategy.equate(&e.0, &key)) {
            SlotFind::Found(_) => false,
            SlotFind::Vacant(i) => {
                order.push(key.clone());
                table.occupy(i, (key, value), |e| Self::hash_entry(strategy, e));
                true
            }
        }
    }

    /// Insert at position `at`, relocating the key if it is already present
    ///
    /// For a new key, `at` may be anywhere up to and including the current
    /// length. For an existing key the entry keeps its value storage but
    /// moves to position `at`, and the previous value is returned.
    pub fn insert_at(&mut self, at: usize, key: K, value: V) -> Result<Option<V>> {
        if at > self.len() {
            return Err(TesseraError::out_of_bounds(at, self.len()));
        }
        let raw = self.strategy.hash_key(&key);
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        match table.locate(raw, |e| strategy.equate(&e.0, &key)) {
            SlotFind::Found(i) => {
                let old = std::mem::replace(&mut table.slot_mut(i).1, value);
                let from = order
                    .position_of(|k| strategy.equate(k, &key))
                    .expect("order index mirrors every live key");
                let key = order.remove_at(from);
                let to = at.min(order.len());
                order.insert(to, key);
                Ok(Some(old))
            }
            SlotFind::Vacant(i) => {
                order.insert(at, key.clone());
                table.occupy(i, (key, value), |e| Self::hash_entry(strategy, e));
                Ok(None)
            }
        }
    }

    /// Remove the entry at position `at`, returning the stored pair
    pub fn remove_at(&mut self, at: usize) -> Result<(K, V)> {
        check_index(at, self.len())?;
        let key = self.order.remove_at(at);
        let raw = self.strategy.hash_key(&key);
        let OrderedHashMap {
            table, strategy, ..
        } = self;
        let entry = table
            .remove(
                raw,
                |e| strategy.equate(&e.0, &key),
                |e| Self::hash_entry(strategy, e),
            )
            .expect("order index mirrors every live key");
        Ok(entry)
    }

    /// Rename `before` to `after` in place: same position, same value
    ///
    /// Returns `Ok(false)` when `before` is absent. Renaming onto a different
    /// key that is already present is rejected before any mutation. Costs
    /// O(n) for the order-position scan; [`replace_key_at`] is the O(1)
    /// variant when the position is already known.
    ///
    /// [`replace_key_at`]: OrderedHashMap::replace_key_at
    pub fn replace_key(&mut self, before: &K, after: K) -> Result<bool> {
        if !self.contains_stored(before) {
            return Ok(false);
        }
        let at = self
            .order
            .position_of(|k| self.strategy.equate(k, before))
            .expect("order index mirrors every live key");
        self.replace_key_at(at, after)?;
        Ok(true)
    }

    /// Rename the key at position `at` to `after`: same position, same value
    pub fn replace_key_at(&mut self, at: usize, after: K) -> Result<()> {
        check_index(at, self.len())?;
        let before = self.order.get(at).clone();
        if self.strategy.equate(&before, &after) {
            // Same key under the strategy: swap the stored spelling only.
            let raw = self.strategy.hash_key(&before);
            let OrderedHashMap {
                table,
                order,
                strategy,
            } = self;
            let i = table
                .find(raw, |e| strategy.equate(&e.0, &before))
                .expect("order index mirrors every live key");
            table.slot_mut(i).0 = after.clone();
            order.set(at, after);
            return Ok(());
        }
        if self.contains_stored(&after) {
            return Err(TesseraError::key_collision(
                "replace_key target already present",
            ));
        }
        let raw = self.strategy.hash_key(&before);
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        let (_, value) = table
            .remove(
                raw,
                |e| strategy.equate(&e.0, &before),
                |e| Self::hash_entry(strategy, e),
            )
            .expect("order index mirrors every live key");
        let raw_after = strategy.hash_key(&after);
        order.set(at, after.clone());
        table.insert_unique(raw_after, (after, value), |e| Self::hash_entry(strategy, e));
        Ok(())
    }

    fn contains_stored(&self, key: &K) -> bool {
        let raw = self.strategy.hash_key(key);
        self.table
            .find(raw, |e| self.strategy.equate(&e.0, key))
            .is_some()
    }

    /// The entry at position `at`
    pub fn get_at(&self, at: usize) -> Result<(&K, &V)> {
        check_index(at, self.len())?;
        let key = self.order.get(at);
        let raw = self.strategy.hash_key(key);
        let i = self
            .table
            .find(raw, |e| self.strategy.equate(&e.0, key))
            .expect("order index mirrors every live key");
        let entry = self.table.slot(i);
        Ok((&entry.0, &entry.1))
    }

    /// The first entry in order, or an [`Empty`] error
    ///
    /// [`Empty`]: crate::TesseraError::Empty
    pub fn first(&self) -> Result<(&K, &V)> {
        self.get_at(0).map_err(|_| TesseraError::empty("first"))
    }

    /// The last entry in order, or an [`Empty`] error
    ///
    /// [`Empty`]: crate::TesseraError::Empty
    pub fn last(&self) -> Result<(&K, &V)> {
        if self.is_empty() {
            return Err(TesseraError::empty("last"));
        }
        self.get_at(self.len() - 1)
    }

    /// Sort the order index by key; slot positions are untouched
    pub fn sort_keys(&mut self)
    where
        K: Ord,
    {
        self.order.sort_by(K::cmp);
    }

    /// Sort the order index by a comparator; slot positions are untouched
    pub fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F) {
        self.order.sort_by(cmp);
    }

    /// Iterate over values in order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Pre-grow so `additional` more inserts cannot trigger a rehash
    pub fn reserve(&mut self, additional: usize) {
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        table.reserve(additional, |e| Self::hash_entry(strategy, e));
        order.reserve(additional);
    }

    /// Shrink toward `max_capacity`, never below what the live count requires
    pub fn shrink_to(&mut self, max_capacity: usize) {
        let OrderedHashMap {
            table, strategy, ..
        } = self;
        table.shrink_to(max_capacity, |e| Self::hash_entry(strategy, e));
    }

    /// Probe-distance statistics over the current layout
    pub fn probe_stats(&self) -> ProbeStats {
        let strategy = &self.strategy;
        self.table.probe_stats(|e| Self::hash_entry(strategy, e))
    }

    /// Keep only the entries the predicate accepts, preserving order
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let mut pos = 0;
        while pos < self.len() {
            let key = self.order.get(pos).clone();
            let raw = self.strategy.hash_key(&key);
            let OrderedHashMap {
                table, strategy, ..
            } = self;
            let i = table
                .find(raw, |e| strategy.equate(&e.0, &key))
                .expect("order index mirrors every live key");
            let entry = table.slot_mut(i);
            if f(&entry.0, &mut entry.1) {
                pos += 1;
            } else {
                self.remove_at(pos).expect("position is in bounds");
            }
        }
    }
}

impl<K, V, O, S> OrderedHashMap<K, V, O, S>
where
    K: Clone,
    O: OrderIndex<K>,
{
    /// Reference to the value stored for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let raw = self.strategy.hash_key(key);
        self.table
            .find(raw, |e| self.strategy.equate(e.0.borrow(), key))
            .map(|i| &self.table.slot(i).1)
    }

    /// Value stored for `key`, or `default` when absent
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.get(key).unwrap_or(default)
    }

    /// Mutable reference to the value stored for `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let raw = self.strategy.hash_key(key);
        let OrderedHashMap {
            table, strategy, ..
        } = self;
        table
            .find(raw, |e| strategy.equate(e.0.borrow(), key))
            .map(|i| &mut table.slot_mut(i).1)
    }

    /// Whether the map holds an entry for `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.get(key).is_some()
    }

    /// Order position of `key`; a linear scan of the order index
    pub fn index_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.order
            .position_of(|k| self.strategy.equate(k.borrow(), key))
    }

    /// Remove the entry for `key`, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q> + KeyStrategy<K>,
    {
        let raw = self.strategy.hash_key(key);
        let OrderedHashMap {
            table,
            order,
            strategy,
        } = self;
        let entry = table.remove(
            raw,
            |e| strategy.equate(e.0.borrow(), key),
            |e| KeyStrategy::<K>::hash_key(strategy, &e.0),
        )?;
        let at = order
            .position_of(|k| strategy.equate(k.borrow(), key))
            .expect("order index mirrors every live key");
        order.remove_at(at);
        Some(entry.1)
    }
}

impl<K, V> Default for OrderedHashMap<K, V, VecOrder<K>, ValueKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, O: Clone, S: Clone> Clone for OrderedHashMap<K, V, O, S> {
    fn clone(&self) -> Self {
        OrderedHashMap {
            table: self.table.clone(),
            order: self.order.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<K, V, O, S> fmt::Debug for OrderedHashMap<K, V, O, S>
where
    K: Clone + fmt::Debug,
    V: fmt::Debug,
    O: OrderIndex<K>,
    S: KeyStrategy<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, O, S> FromIterator<(K, V)> for OrderedHashMap<K, V, O, S>
where
    K: Clone,
    O: OrderIndex<K> + Default,
    S: KeyStrategy<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_strategy(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, O, S> Extend<(K, V)> for OrderedHashMap<K, V, O, S>
where
    K: Clone,
    O: OrderIndex<K>,
    S: KeyStrategy<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Ordered borrowing entry iterator
pub struct OrderedIter<'a, K, V, O, S> {
    map: &'a OrderedHashMap<K, V, O, S>,
    pos: usize,
}

impl<'a, K, V, O, S> Iterator for OrderedIter<'a, K, V, O, S>
where
    K: Clone,
    O: OrderIndex<K>,
    S: KeyStrategy<K>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.map.len() {
            return None;
        }
        let entry = self.map.get_at(self.pos).expect("position is in bounds");
        self.pos += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.map.len() - self.pos.min(self.map.len());
        (remaining, Some(remaining))
    }
}
