//! FlatHashSet - open-addressing hash set over the shared probe engine

use crate::error::{Result, TesseraError};
use crate::hash_map::key_strategy::{KeyStrategy, ValueKey};
use crate::hash_map::probe_table::{
    FloodMitigation, ProbeStats, ProbeTable, RawCursor, SlotFind, TableConfig,
};
use std::borrow::Borrow;
use std::fmt;

/// Open-addressing hash set with pluggable key strategy
///
/// The set variant of [`FlatHashMap`]: same engine, same guarantees, no
/// value array.
///
/// [`FlatHashMap`]: crate::FlatHashMap
///
/// # Examples
///
/// ```rust
/// use tessera::FlatHashSet;
///
/// let mut set = FlatHashSet::new();
/// assert!(set.insert(5));
/// assert!(!set.insert(5));
/// assert!(set.contains(&5));
/// ```
pub struct FlatHashSet<K, S = ValueKey> {
    table: ProbeTable<K>,
    strategy: S,
}

impl<K> FlatHashSet<K, ValueKey> {
    /// Create an empty set with default configuration
    pub fn new() -> Self {
        Self::with_strategy(ValueKey::new())
    }

    /// Create an empty set sized for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig {
            initial_capacity: capacity,
            ..TableConfig::default()
        })
    }

    /// Create an empty set from explicit configuration
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_strategy(config, ValueKey::new())
    }
}

impl<K, S> FlatHashSet<K, S> {
    /// Create an empty set bound to `strategy`
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(TableConfig::default(), strategy)
            .expect("default config is valid")
    }

    /// Create an empty set from explicit configuration and strategy
    pub fn with_config_and_strategy(config: TableConfig, strategy: S) -> Result<Self> {
        Ok(FlatHashSet {
            table: ProbeTable::with_config(&config)?,
            strategy,
        })
    }

    /// Number of live elements
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the set holds no elements
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

    /// The strategy this set consults for hashing and equality
    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Swap in a new strategy value; only legal while the set is empty
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

    /// Drop every element, keeping the current capacity
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Drop every element and reallocate sized for `expected` future elements
    pub fn clear_with_capacity(&mut self, expected: usize) {
        self.table.clear_with_capacity(expected);
    }

    /// Iterate over elements in arbitrary slot order
    pub fn iter(&self) -> SetIter<'_, K> {
        SetIter {
            table: &self.table,
            index: 0,
            remaining: self.table.len(),
        }
    }
}

impl<K, S> FlatHashSet<K, S>
where
    S: KeyStrategy<K>,
{
    /// Insert an element; returns whether the set changed
    ///
    /// A present element is left untouched and the argument is dropped.
    pub fn insert(&mut self, key: K) -> bool {
        let raw = self.strategy.hash_key(&key);
        let FlatHashSet { table, strategy } = self;
        match table.locate(raw, |e| strategy.equate(e, &key)) {
            SlotFind::Found(_) => false,
            SlotFind::Vacant(i) => {
                table.occupy(i, key, |e| strategy.hash_key(e));
                true
            }
        }
    }

    /// Insert an element, replacing and returning a stored equal one
    ///
    /// Under a filtering strategy the replaced element may differ textually
    /// from its replacement while comparing equal.
    pub fn replace(&mut self, key: K) -> Option<K> {
        let raw = self.strategy.hash_key(&key);
        let FlatHashSet { table, strategy } = self;
        match table.locate(raw, |e| strategy.equate(e, &key)) {
            SlotFind::Found(i) => Some(table.replace_slot(i, key)),
            SlotFind::Vacant(i) => {
                table.occupy(i, key, |e| strategy.hash_key(e));
                None
            }
        }
    }

    /// Pre-grow so `additional` more inserts cannot trigger a rehash
    pub fn reserve(&mut self, additional: usize) {
        let FlatHashSet { table, strategy } = self;
        table.reserve(additional, |e| strategy.hash_key(e));
    }

    /// Shrink toward `max_capacity`, never below what the live count requires
    pub fn shrink_to(&mut self, max_capacity: usize) {
        let FlatHashSet { table, strategy } = self;
        table.shrink_to(max_capacity, |e| strategy.hash_key(e));
    }

    /// An arbitrary element, or an [`Empty`] error on an empty set
    ///
    /// [`Empty`]: crate::TesseraError::Empty
    pub fn first(&self) -> Result<&K> {
        let i = self
            .table
            .next_occupied(0)
            .ok_or(TesseraError::empty("first"))?;
        Ok(self.table.slot(i))
    }

    /// Probe-distance statistics over the current layout
    pub fn probe_stats(&self) -> ProbeStats {
        let strategy = &self.strategy;
        self.table.probe_stats(|e| strategy.hash_key(e))
    }

    /// Mutating cursor over the elements; the only safe way to remove while
    /// traversing
    pub fn cursor_mut(&mut self) -> SetCursorMut<'_, K, S> {
        SetCursorMut {
            set: self,
            raw: RawCursor::new(),
        }
    }

    /// Keep only the elements the predicate accepts
    pub fn retain(&mut self, mut f: impl FnMut(&K) -> bool) {
        let mut cursor = self.cursor_mut();
        loop {
            let keep = match cursor.advance() {
                None => break,
                Some(k) => f(k),
            };
            if !keep {
                cursor.remove();
            }
        }
    }
}

impl<K, S> FlatHashSet<K, S> {
    /// Whether the set holds an element equal to `key`
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        self.get(key).is_some()
    }

    /// Reference to the stored element equal to `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q>,
    {
        let raw = self.strategy.hash_key(key);
        self.table
            .find(raw, |e| self.strategy.equate(e.borrow(), key))
            .map(|i| self.table.slot(i))
    }

    /// Remove the element equal to `key`; returns whether the set changed
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q> + KeyStrategy<K>,
    {
        self.take(key).is_some()
    }

    /// Remove and return the stored element equal to `key`
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyStrategy<Q> + KeyStrategy<K>,
    {
        let raw = self.strategy.hash_key(key);
        let FlatHashSet { table, strategy } = self;
        table.remove(
            raw,
            |e| strategy.equate(e.borrow(), key),
            |e| KeyStrategy::<K>::hash_key(strategy, e),
        )
    }
}

impl<K> Default for FlatHashSet<K, ValueKey> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, S: Clone> Clone for FlatHashSet<K, S> {
    fn clone(&self) -> Self {
        FlatHashSet {
            table: self.table.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<K: fmt::Debug, S> fmt::Debug for FlatHashSet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S> FromIterator<K> for FlatHashSet<K, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_strategy(S::default());
        set.extend(iter);
        set
    }
}

impl<K, S> Extend<K> for FlatHashSet<K, S>
where
    S: KeyStrategy<K>,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for k in iter {
            self.insert(k);
        }
    }
}

/// Borrowing element iterator in arbitrary slot order
pub struct SetIter<'a, K> {
    table: &'a ProbeTable<K>,
    index: usize,
    remaining: usize,
}

impl<'a, K> Iterator for SetIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.table.next_occupied(self.index)?;
        self.index = i + 1;
        self.remaining -= 1;
        Some(self.table.slot(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for SetIter<'_, K> {}

impl<'a, K, S> IntoIterator for &'a FlatHashSet<K, S> {
    type Item = &'a K;
    type IntoIter = SetIter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Streaming cursor permitting removal during traversal
pub struct SetCursorMut<'a, K, S> {
    set: &'a mut FlatHashSet<K, S>,
    raw: RawCursor,
}

impl<K, S> SetCursorMut<'_, K, S>
where
    S: KeyStrategy<K>,
{
    /// Step to the next element
    pub fn advance(&mut self) -> Option<&K> {
        let i = self.raw.advance(&self.set.table)?;
        Some(self.set.table.slot(i))
    }

    /// Remove the element most recently yielded by `advance`
    ///
    /// # Panics
    /// Panics if called before the first advance, or twice for one element.
    pub fn remove(&mut self) -> K {
        let FlatHashSet { table, strategy } = &mut *self.set;
        self.raw.remove(table, |e| strategy.hash_key(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_size() {
        // Duplicate inserts leave the distinct-element count unchanged.
        let mut set = FlatHashSet::with_capacity(4).unwrap();
        for k in [5u32, 21, 5, 37] {
            set.insert(k);
        }
        assert_eq!(set.len(), 3);
        assert!(set.contains(&5));
        assert!(set.contains(&21));
        assert!(set.contains(&37));
        assert!(!set.contains(&6));
    }

    #[test]
    fn test_remove_and_take() {
        let mut set = FlatHashSet::new();
        set.insert("a".to_string());
        assert_eq!(set.take("a"), Some("a".to_string()));
        assert!(!set.remove("a"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_replace_returns_old_element() {
        let mut set: FlatHashSet<String, crate::FilteredKey> =
            FlatHashSet::with_strategy(crate::FilteredKey::letters_ignoring_case());
        assert_eq!(set.replace("Hello!".to_string()), None);
        assert_eq!(set.replace("hello".to_string()), Some("Hello!".to_string()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_removal_closure() {
        let mut set = FlatHashSet::with_capacity(4).unwrap();
        for i in 0..100u32 {
            set.insert(i);
        }
        for victim in 0..50u32 {
            assert!(set.remove(&victim));
            for other in (victim + 1)..100u32 {
                assert!(set.contains(&other), "{} lost removing {}", other, victim);
            }
        }
        assert_eq!(set.len(), 50);
    }

    #[test]
    fn test_first() {
        let mut set = FlatHashSet::new();
        assert!(set.first().is_err());
        set.insert(9u32);
        assert_eq!(set.first().unwrap(), &9);
    }

    #[test]
    fn test_cursor_remove() {
        let mut set: FlatHashSet<u32> = (0..40u32).collect();
        let mut cursor = set.cursor_mut();
        loop {
            let remove = match cursor.advance() {
                None => break,
                Some(k) => *k < 20,
            };
            if remove {
                cursor.remove();
            }
        }
        assert_eq!(set.len(), 20);
        for i in 0..40u32 {
            assert_eq!(set.contains(&i), i >= 20);
        }
    }

    #[test]
    fn test_retain() {
        let mut set: FlatHashSet<u32> = (0..100u32).collect();
        set.retain(|k| k % 4 == 0);
        assert_eq!(set.len(), 25);
        assert!(set.contains(&96));
        assert!(!set.contains(&97));
    }

    #[test]
    fn test_iter_and_debug() {
        let set: FlatHashSet<u32> = (0..5u32).collect();
        let mut items: Vec<u32> = set.iter().copied().collect();
        items.sort_unstable();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);

        let single: FlatHashSet<u32> = std::iter::once(7u32).collect();
        assert_eq!(format!("{:?}", single), "{7}");
    }
}
