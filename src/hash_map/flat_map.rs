//! FlatHashMap - open-addressing hash map with backward-shift removal
//!
//! Keys and values live co-located in one flat slot array; collisions resolve
//! by linear probing and removal closes gaps instead of leaving tombstones,
//! so lookup cost never degrades as entries churn.
//!
//! # Examples
//!
//! ```rust
//! use tessera::FlatHashMap;
//!
//! let mut map = FlatHashMap::new();
//! map.insert("hello", 42);
//! assert_eq!(map.get("hello"), Some(&42));
//! ```

use crate::error::{Result, TesseraError};
use crate::hash_map::key_strategy::{KeyStrategy, ValueKey};
use crate::hash_map::probe_table::{
    FloodMitigation, ProbeStats, ProbeTable, RawCursor, SlotFind, TableConfig,
};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Open-addressing hash map with pluggable key strategy
///
/// The strategy decides hashing and equality for every operation; the default
/// [`ValueKey`] uses the key's own `Hash`/`Eq` through a per-instance random
/// `ahash` state. Lookups accept any borrowed form of the key the strategy
/// understands, so a `FlatHashMap<String, V>` answers `&str` queries.
pub struct FlatHashMap<K, V, S = ValueKey> {
    table: ProbeTable<(K, V)>,
    strategy: S,
}

impl<K, V> FlatHashMap<K, V, ValueKey> {
    /// Create an empty map with default configuration
    pub fn new() -> Self {
        Self::with_strategy(ValueKey::new())
    }

    /// Create an empty map sized for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig {
            initial_capacity: capacity,
            ..TableConfig::default()
        })
    }

    /// Create an empty map from explicit configuration
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_strategy(config, ValueKey::new())
    }
}

impl<K, V, S> FlatHashMap<K, V, S> {
    /// Create an empty map bound to `strategy`
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(TableConfig::default(), strategy)
            .expect("default config is valid")
    }

    /// Create an empty map from explicit configuration and strategy
    pub fn with_config_and_strategy(config: TableConfig, strategy: S) -> Result<Self> {
        Ok(FlatHashMap {
            table: ProbeTable::with_config(&config)?,
            strategy,
        })
    }

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

    /// Swap in a new strategy value
    ///
    /// Slot positions and stored comparisons depend on the old strategy, so
    /// this is only legal while the map is empty.
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
    }

    /// Drop every entry and reallocate sized for `expected` future entries
    pub fn clear_with_capacity(&mut self, expected: usize) {
        self.table.clear_with_capacity(expected);
    }

    /// Iterate over `(&K, &V)` entries in arbitrary slot order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: &self.table,
            index: 0,
            remaining: self.table.len(),
        }
    }

    /// Iterate over keys in arbitrary slot order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterate over values in arbitrary slot order
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterate over mutable values in arbitrary slot order
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            table: NonNull::from(&mut self.table),
            index: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S> FlatHashMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    #[inline]
    fn hash_entry(strategy: &S, entry: &(K, V)) -> u64 {
        strategy.hash_key(&entry.0)
    }

    /// Insert a key-value pair, returning the previous value for this key
    ///
    /// Re-insertion overwrites the value in place and keeps the stored key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let raw = self.strategy.hash_key(&key);
        let FlatHashMap { table, strategy } = self;
        match table.locate(raw, |e| strategy.equate(&e.0, &key)) {
            SlotFind::Found(i) => Some(std::mem::replace(&mut table.slot_mut(i).1, value)),
            SlotFind::Vacant(i) => {
                table.occupy(i, (key, value), |e| Self::hash_entry(strategy, e));
                None
            }
        }
    }

    /// Insert only if the key is absent; returns whether an insert happened
    pub fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        let raw = self.strategy.hash_key(&key);
        let FlatHashMap { table, strategy } = self;
        match table.locate(raw, |e| strategy.equate(&e.0, &key)) {
            SlotFind::Found(_) => false,
            SlotFind::Vacant(i) => {
                table.occupy(i, (key, value), |e| Self::hash_entry(strategy, e));
                true
            }
        }
    }

    /// Pre-grow so `additional` more inserts cannot trigger a rehash
    pub fn reserve(&mut self, additional: usize) {
        let FlatHashMap { table, strategy } = self;
        table.reserve(additional, |e| Self::hash_entry(strategy, e));
    }

    /// Shrink toward `max_capacity`, never below what the live count requires
    ///
    /// Always reallocates and rehashes when a smaller capacity is possible;
    /// the map never shrinks on its own.
    pub fn shrink_to(&mut self, max_capacity: usize) {
        let FlatHashMap { table, strategy } = self;
        table.shrink_to(max_capacity, |e| Self::hash_entry(strategy, e));
    }

    /// An arbitrary entry, or an [`Empty`] error on an empty map
    ///
    /// [`Empty`]: crate::TesseraError::Empty
    pub fn first(&self) -> Result<(&K, &V)> {
        let i = self
            .table
            .next_occupied(0)
            .ok_or(TesseraError::empty("first"))?;
        let entry = self.table.slot(i);
        Ok((&entry.0, &entry.1))
    }

    /// Probe-distance statistics over the current layout
    pub fn probe_stats(&self) -> ProbeStats {
        let strategy = &self.strategy;
        self.table.probe_stats(|e| Self::hash_entry(strategy, e))
    }

    /// Mutating cursor over the entries; the only safe way to remove while
    /// traversing
    pub fn cursor_mut(&mut self) -> CursorMut<'_, K, V, S> {
        CursorMut {
            map: self,
            raw: RawCursor::new(),
        }
    }

    /// Keep only the entries the predicate accepts
    pub fn retain(&mut self, mut f: impl FnMut(&K, &mut V) -> bool) {
        let mut cursor = self.cursor_mut();
        loop {
            let keep = match cursor.advance_mut() {
                None => break,
                Some((k, v)) => f(k, v),
            };
            if !keep {
                cursor.remove();
            }
        }
    }
}

impl<K, V, S> FlatHashMap<K, V, S> {
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

    /// The stored key-value pair for `key`
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let raw = self.strategy.hash_key(key);
        self.table
            .find(raw, |e| self.strategy.equate(e.0.borrow(), key))
            .map(|i| {
                let entry = self.table.slot(i);
                (&entry.0, &entry.1)
            })
    }

    /// Mutable reference to the value stored for `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let raw = self.strategy.hash_key(key);
        let FlatHashMap { table, strategy } = self;
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

    /// Remove the entry for `key`, returning its value
    ///
    /// Absence is not an error: a miss returns `None`. The vacated slot is
    /// closed by backward shifting, so later lookups never early-stop.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q> + KeyStrategy<K>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Remove and return the full stored entry for `key`
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q> + KeyStrategy<K>,
    {
        let raw = self.strategy.hash_key(key);
        let FlatHashMap { table, strategy } = self;
        table.remove(
            raw,
            |e| strategy.equate(e.0.borrow(), key),
            |e| KeyStrategy::<K>::hash_key(strategy, &e.0),
        )
    }
}

impl<K, V> Default for FlatHashMap<K, V, ValueKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, S: Clone> Clone for FlatHashMap<K, V, S> {
    fn clone(&self) -> Self {
        FlatHashMap {
            table: self.table.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<K, V, S> fmt::Debug for FlatHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> FromIterator<(K, V)> for FlatHashMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_strategy(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for FlatHashMap<K, V, S>
where
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

/// Borrowing entry iterator in arbitrary slot order
pub struct Iter<'a, K, V> {
    table: &'a ProbeTable<(K, V)>,
    index: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.table.next_occupied(self.index)?;
        self.index = i + 1;
        self.remaining -= 1;
        let entry = self.table.slot(i);
        Some((&entry.0, &entry.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Borrowing key iterator
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Borrowing value iterator
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Mutable value iterator
pub struct ValuesMut<'a, K, V> {
    table: NonNull<ProbeTable<(K, V)>>,
    index: usize,
    _marker: PhantomData<&'a mut ProbeTable<(K, V)>>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the iterator holds the map's &mut borrow for 'a, and each
        // occupied slot is visited at most once, so yielded references never
        // alias each other or any other live reference.
        let table = unsafe { self.table.as_mut() };
        let i = table.next_occupied(self.index)?;
        self.index = i + 1;
        let value: *mut V = &mut table.slot_mut(i).1;
        // SAFETY: see above; the pointee outlives 'a inside the borrowed map.
        Some(unsafe { &mut *value })
    }
}

impl<'a, K, V, S> IntoIterator for &'a FlatHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Streaming cursor permitting removal during traversal
///
/// Obtained from [`FlatHashMap::cursor_mut`]. `remove` runs backward-shift
/// removal and repairs the cursor's bookkeeping when the shift drags entries
/// across the visited boundary, so traversal still yields every surviving
/// entry exactly once.
pub struct CursorMut<'a, K, V, S> {
    map: &'a mut FlatHashMap<K, V, S>,
    raw: RawCursor,
}

impl<K, V, S> CursorMut<'_, K, V, S>
where
    S: KeyStrategy<K>,
{
    /// Step to the next entry
    pub fn advance(&mut self) -> Option<(&K, &V)> {
        let i = self.raw.advance(&self.map.table)?;
        let entry = self.map.table.slot(i);
        Some((&entry.0, &entry.1))
    }

    /// Step to the next entry, with a mutable value reference
    pub fn advance_mut(&mut self) -> Option<(&K, &mut V)> {
        let i = self.raw.advance(&self.map.table)?;
        let entry = self.map.table.slot_mut(i);
        Some((&entry.0, &mut entry.1))
    }

    /// Remove the entry most recently yielded by an advance
    ///
    /// # Panics
    /// Panics if called before the first advance, or twice for one entry -
    /// a usage fault, not a recoverable condition.
    pub fn remove(&mut self) -> (K, V) {
        let FlatHashMap { table, strategy } = &mut *self.map;
        self.raw.remove(table, |e| strategy.hash_key(&e.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_map::key_strategy::FilteredKey;

    #[test]
    fn test_basic_insert_get() {
        let mut map = FlatHashMap::new();
        assert_eq!(map.insert("hello".to_string(), 42), None);
        assert_eq!(map.get("hello"), Some(&42));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_update_existing() {
        let mut map = FlatHashMap::new();
        assert_eq!(map.insert("key", 1), None);
        assert_eq!(map.insert("key", 2), Some(1));
        assert_eq!(map.get(&"key"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_if_absent() {
        let mut map = FlatHashMap::new();
        assert!(map.insert_if_absent(1, "first"));
        assert!(!map.insert_if_absent(1, "second"));
        assert_eq!(map.get(&1), Some(&"first"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_returns_value() {
        let mut map = FlatHashMap::new();
        map.insert(7u32, "seven");
        assert_eq!(map.remove(&7), Some("seven"));
        assert_eq!(map.remove(&7), None);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_removal_closure() {
        // The critical regression check: removing one key must never lose
        // any other.
        let mut map = FlatHashMap::with_capacity(8).unwrap();
        for i in 0..200u32 {
            map.insert(i, i * 10);
        }
        for victim in (0..200u32).step_by(3) {
            assert_eq!(map.remove(&victim), Some(victim * 10));
            for i in 0..200u32 {
                let expected = if i % 3 == 0 && i <= victim {
                    None
                } else {
                    Some(i * 10)
                };
                assert_eq!(map.get(&i).copied(), expected, "key {} after removing {}", i, victim);
            }
        }
    }

    #[test]
    fn test_growth_stability_from_minimal_capacity() {
        let mut map = FlatHashMap::with_config(TableConfig {
            initial_capacity: 1,
            ..TableConfig::default()
        })
        .unwrap();
        let mut growths = 0;
        let mut last_capacity = map.capacity();
        for i in 0..1000u32 {
            map.insert(i, i);
            if map.capacity() != last_capacity {
                growths += 1;
                last_capacity = map.capacity();
                // Re-verify full retrievability after every growth event.
                for j in 0..=i {
                    assert_eq!(map.get(&j), Some(&j));
                }
            }
        }
        assert!(growths > 0);
        assert_eq!(map.len(), 1000);
    }

    #[test]
    fn test_get_or_default() {
        let mut map = FlatHashMap::new();
        map.insert("present", 1);
        let fallback = -1;
        assert_eq!(*map.get_or(&"present", &fallback), 1);
        assert_eq!(*map.get_or(&"absent", &fallback), -1);
    }

    #[test]
    fn test_get_mut() {
        let mut map = FlatHashMap::new();
        map.insert("key", 1);
        if let Some(v) = map.get_mut(&"key") {
            *v = 10;
        }
        assert_eq!(map.get(&"key"), Some(&10));
    }

    #[test]
    fn test_first_on_empty_is_error() {
        let map: FlatHashMap<u32, u32> = FlatHashMap::new();
        assert!(matches!(
            map.first(),
            Err(TesseraError::Empty { operation: "first" })
        ));
    }

    #[test]
    fn test_first_returns_some_live_entry() {
        let mut map = FlatHashMap::new();
        map.insert(1u32, "one");
        map.insert(2u32, "two");
        let (k, _) = map.first().unwrap();
        assert!(map.contains_key(k));
    }

    #[test]
    fn test_invalid_load_factor_rejected() {
        for lf in [0.0, -0.5, 1.5, f64::NAN] {
            let result = FlatHashMap::<u32, u32>::with_config(TableConfig {
                load_factor: lf,
                ..TableConfig::default()
            });
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_replace_strategy_requires_empty() {
        let mut map: FlatHashMap<String, u32, FilteredKey> =
            FlatHashMap::with_strategy(FilteredKey::letters_ignoring_case());
        map.insert("Hello!".to_string(), 1);
        assert!(map.replace_strategy(FilteredKey::default()).is_err());
        map.clear();
        assert!(map.replace_strategy(FilteredKey::default()).is_ok());
    }

    #[test]
    fn test_filtered_string_map() {
        let mut map: FlatHashMap<String, u32, FilteredKey> =
            FlatHashMap::with_strategy(FilteredKey::letters_ignoring_case());
        map.insert("Hello!".to_string(), 42);
        assert_eq!(map.get("hello"), Some(&42));
        assert_eq!(map.get("HELLO"), Some(&42));
        assert_eq!(map.get("h-e-l-l-o"), Some(&42));
        assert_eq!(map.get("world"), None);
        // Re-insertion under an equivalent spelling overwrites, not duplicates.
        assert_eq!(map.insert("HELLO".to_string(), 7), Some(42));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iter_covers_all_entries() {
        let mut map = FlatHashMap::new();
        for i in 0..50u32 {
            map.insert(i, i * 2);
        }
        let mut seen: Vec<u32> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(map.iter().len(), 50);
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());

        let key_sum: u32 = map.keys().sum();
        let value_sum: u32 = map.values().sum();
        assert_eq!(value_sum, key_sum * 2);
    }

    #[test]
    fn test_values_mut() {
        let mut map = FlatHashMap::new();
        for i in 0..10u32 {
            map.insert(i, i);
        }
        for v in map.values_mut() {
            *v += 100;
        }
        for i in 0..10u32 {
            assert_eq!(map.get(&i), Some(&(i + 100)));
        }
    }

    #[test]
    fn test_cursor_remove_midway() {
        let mut map = FlatHashMap::new();
        for i in 0..30u32 {
            map.insert(i, i);
        }
        let mut cursor = map.cursor_mut();
        let mut yielded = 0;
        loop {
            let remove = match cursor.advance() {
                None => break,
                Some((k, _)) => *k % 2 == 0,
            };
            yielded += 1;
            if remove {
                cursor.remove();
            }
        }
        assert_eq!(yielded, 30);
        assert_eq!(map.len(), 15);
        for i in 0..30u32 {
            assert_eq!(map.contains_key(&i), i % 2 == 1);
        }
    }

    #[test]
    fn test_retain() {
        let mut map = FlatHashMap::new();
        for i in 0..100u32 {
            map.insert(i, i);
        }
        map.retain(|k, v| {
            *v += 1;
            k % 5 == 0
        });
        assert_eq!(map.len(), 20);
        for i in (0..100u32).step_by(5) {
            assert_eq!(map.get(&i), Some(&(i + 1)));
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut map = FlatHashMap::new();
        map.insert(1u32, "one");
        let copy = map.clone();
        map.insert(2u32, "two");
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.get(&1), Some(&"one"));
        assert_eq!(copy.get(&2), None);
    }

    #[test]
    fn test_from_iterator_and_extend() {
        let map: FlatHashMap<u32, u32> = (0..10u32).map(|i| (i, i)).collect();
        assert_eq!(map.len(), 10);

        let mut map2 = FlatHashMap::new();
        map2.extend((0..5u32).map(|i| (i, i)));
        assert_eq!(map2.len(), 5);
    }

    #[test]
    fn test_clear_with_capacity_shrinks() {
        let mut map = FlatHashMap::new();
        for i in 0..1000u32 {
            map.insert(i, i);
        }
        let grown = map.capacity();
        map.clear_with_capacity(8);
        assert!(map.is_empty());
        assert!(map.capacity() < grown);
        map.insert(1, 1);
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_shrink_to_reallocates() {
        let mut map = FlatHashMap::new();
        for i in 0..500u32 {
            map.insert(i, i);
        }
        for i in 100..500u32 {
            map.remove(&i);
        }
        let grown = map.capacity();
        map.shrink_to(0);
        assert!(map.capacity() < grown);
        assert_eq!(map.len(), 100);
        for i in 0..100u32 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_probe_stats_reasonable_at_default_load() {
        let mut map = FlatHashMap::new();
        for i in 0..10_000u32 {
            map.insert(i, i);
        }
        let stats = map.probe_stats();
        assert_eq!(stats.entries, 10_000);
        assert!(stats.average_probe_distance < 4.0);
    }

    #[test]
    fn test_debug_format() {
        let mut map = FlatHashMap::new();
        map.insert(1u32, 2u32);
        assert_eq!(format!("{:?}", map), "{1: 2}");
    }
}
