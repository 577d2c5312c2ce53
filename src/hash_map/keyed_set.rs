//! KeyedHashSet - records stored whole, addressed by an extracted key
//!
//! Holds composite records while membership, lookup, and removal operate on
//! a key derived by a [`KeyExtract`] implementation. The extractor runs on
//! every comparison, so two records sharing a key occupy one slot no matter
//! how their other fields differ.

use crate::error::{Result, TesseraError};
use crate::hash_map::key_strategy::KeyExtract;
use crate::hash_map::probe_table::{ProbeStats, ProbeTable, SlotFind, TableConfig};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

#[inline]
fn record_hash<T, X: KeyExtract<T>>(
    extractor: &X,
    hash_builder: &ahash::RandomState,
    record: &T,
) -> u64 {
    let mut hasher = hash_builder.build_hasher();
    extractor.extract(record).hash(&mut hasher);
    hasher.finish()
}

/// Hash set of records keyed by an extracted field
///
/// # Examples
///
/// ```rust
/// use tessera::{KeyedHashSet, KeyExtract};
///
/// #[derive(Debug, PartialEq)]
/// struct User { id: u64, name: &'static str }
///
/// struct ById;
/// impl KeyExtract<User> for ById {
///     type Key = u64;
///     fn extract<'a>(&self, record: &'a User) -> &'a u64 { &record.id }
/// }
///
/// let mut users = KeyedHashSet::new(ById);
/// users.insert(User { id: 1, name: "ada" });
/// users.insert(User { id: 1, name: "grace" });
/// assert_eq!(users.len(), 1);
/// assert_eq!(users.get(&1).unwrap().name, "grace");
/// ```
pub struct KeyedHashSet<T, X> {
    table: ProbeTable<T>,
    extractor: X,
    hash_builder: ahash::RandomState,
}

impl<T, X> KeyedHashSet<T, X>
where
    X: KeyExtract<T>,
{
    /// Create an empty set around `extractor`
    pub fn new(extractor: X) -> Self {
        Self::with_config(TableConfig::default(), extractor).expect("default config is valid")
    }

    /// Create an empty set from explicit configuration
    pub fn with_config(config: TableConfig, extractor: X) -> Result<Self> {
        Ok(KeyedHashSet {
            table: ProbeTable::with_config(&config)?,
            extractor,
            hash_builder: ahash::RandomState::new(),
        })
    }

    #[inline]
    fn hash_key(&self, key: &X::Key) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Number of live records
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the set holds no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Current slot count (always a power of two)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Insert a record, replacing and returning any record sharing its key
    ///
    /// Overwrite policy: last write wins. Use [`insert_if_absent`] to keep
    /// the first record instead.
    ///
    /// [`insert_if_absent`]: KeyedHashSet::insert_if_absent
    pub fn insert(&mut self, record: T) -> Option<T> {
        let raw = self.hash_key(self.extractor.extract(&record));
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        let key = extractor.extract(&record);
        match table.locate(raw, |e| extractor.extract(e) == key) {
            SlotFind::Found(i) => Some(table.replace_slot(i, record)),
            SlotFind::Vacant(i) => {
                table.occupy(i, record, |e| record_hash(extractor, hash_builder, e));
                None
            }
        }
    }

    /// Insert only if no record shares the key; a rejected record is handed back
    pub fn insert_if_absent(&mut self, record: T) -> Option<T> {
        let raw = self.hash_key(self.extractor.extract(&record));
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        let key = extractor.extract(&record);
        match table.locate(raw, |e| extractor.extract(e) == key) {
            SlotFind::Found(_) => Some(record),
            SlotFind::Vacant(i) => {
                table.occupy(i, record, |e| record_hash(extractor, hash_builder, e));
                None
            }
        }
    }

    /// Reference to the record stored under `key`
    pub fn get(&self, key: &X::Key) -> Option<&T> {
        let raw = self.hash_key(key);
        self.table
            .find(raw, |e| self.extractor.extract(e) == key)
            .map(|i| self.table.slot(i))
    }

    /// Whether a record is stored under `key`
    pub fn contains_key(&self, key: &X::Key) -> bool {
        self.get(key).is_some()
    }

    /// Remove and return the record stored under `key`
    pub fn remove(&mut self, key: &X::Key) -> Option<T> {
        let raw = self.hash_key(key);
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        table.remove(
            raw,
            |e| extractor.extract(e) == key,
            |e| record_hash(extractor, hash_builder, e),
        )
    }

    /// An arbitrary record, or an [`Empty`] error on an empty set
    ///
    /// [`Empty`]: crate::TesseraError::Empty
    pub fn first(&self) -> Result<&T> {
        let i = self
            .table
            .next_occupied(0)
            .ok_or(TesseraError::empty("first"))?;
        Ok(self.table.slot(i))
    }

    /// Drop every record, keeping the current capacity
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Pre-grow so `additional` more inserts cannot trigger a rehash
    pub fn reserve(&mut self, additional: usize) {
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        table.reserve(additional, |e| record_hash(extractor, hash_builder, e));
    }

    /// Shrink toward `max_capacity`, never below what the live count requires
    pub fn shrink_to(&mut self, max_capacity: usize) {
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        table.shrink_to(max_capacity, |e| record_hash(extractor, hash_builder, e));
    }

    /// Probe-distance statistics over the current layout
    pub fn probe_stats(&self) -> ProbeStats {
        let KeyedHashSet {
            table,
            extractor,
            hash_builder,
        } = self;
        table.probe_stats(|e| record_hash(extractor, hash_builder, e))
    }

    /// Iterate over records in arbitrary slot order
    pub fn iter(&self) -> KeyedIter<'_, T> {
        KeyedIter {
            table: &self.table,
            index: 0,
            remaining: self.table.len(),
        }
    }
}

impl<T: fmt::Debug, X> fmt::Debug for KeyedHashSet<T, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        let mut next = self.table.next_occupied(0);
        while let Some(i) = next {
            set.entry(self.table.slot(i));
            next = self.table.next_occupied(i + 1);
        }
        set.finish()
    }
}

/// Borrowing record iterator in arbitrary slot order
pub struct KeyedIter<'a, T> {
    table: &'a ProbeTable<T>,
    index: usize,
    remaining: usize,
}

impl<'a, T> Iterator for KeyedIter<'a, T> {
    type Item = &'a T;

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

impl<T> ExactSizeIterator for KeyedIter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        id: u32,
        name: &'static str,
    }

    struct ById;
    impl KeyExtract<Record> for ById {
        type Key = u32;
        fn extract<'a>(&self, record: &'a Record) -> &'a u32 {
            &record.id
        }
    }

    fn record(id: u32, name: &'static str) -> Record {
        Record { id, name }
    }

    #[test]
    fn test_shared_key_collapses_to_one_record() {
        let mut set = KeyedHashSet::new(ById);
        assert!(set.insert(record(1, "ada")).is_none());
        let displaced = set.insert(record(1, "grace"));
        assert_eq!(displaced, Some(record(1, "ada")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&1).unwrap().name, "grace");
    }

    #[test]
    fn test_insert_if_absent_keeps_first() {
        let mut set = KeyedHashSet::new(ById);
        assert!(set.insert_if_absent(record(1, "ada")).is_none());
        let rejected = set.insert_if_absent(record(1, "grace"));
        assert_eq!(rejected, Some(record(1, "grace")));
        assert_eq!(set.get(&1).unwrap().name, "ada");
    }

    #[test]
    fn test_remove_by_key() {
        let mut set = KeyedHashSet::new(ById);
        set.insert(record(1, "ada"));
        set.insert(record(2, "grace"));
        assert_eq!(set.remove(&1), Some(record(1, "ada")));
        assert_eq!(set.remove(&1), None);
        assert!(set.contains_key(&2));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_growth_keeps_records_addressable() {
        let mut set = KeyedHashSet::new(ById);
        for id in 0..500u32 {
            set.insert(record(id, "r"));
        }
        assert_eq!(set.len(), 500);
        for id in 0..500u32 {
            assert!(set.contains_key(&id));
        }
    }

    #[test]
    fn test_iter_and_first() {
        let mut set = KeyedHashSet::new(ById);
        assert!(set.first().is_err());
        set.insert(record(1, "ada"));
        set.insert(record(2, "grace"));
        assert_eq!(set.iter().count(), 2);
        let first = set.first().unwrap();
        assert!(set.contains_key(&first.id));
    }
}
