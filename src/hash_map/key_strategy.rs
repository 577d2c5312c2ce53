//! Pluggable hashing and equality strategies
//!
//! Every container variant consults its strategy on each comparison, so the
//! same engine serves plain value keys, filtered/edited string keys, and
//! (through [`KeyExtract`]) records keyed by one of their fields. Strategies
//! must be pure and deterministic: a strategy that answers differently for
//! the same key breaks every table invariant.
//!
//! A strategy is part of the container's type. Replacing the strategy value
//! of a live container is only legal while it is empty — slot positions and
//! stored comparisons depend on the old strategy.

use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

/// Hash/equality function pair bound to a container
///
/// `Q` is the borrowed key form, so a `FlatHashMap<String, V>` can be queried
/// with `&str` the same way the standard map can.
pub trait KeyStrategy<Q: ?Sized> {
    /// Native hash of `key`, before engine-level mixing
    fn hash_key(&self, key: &Q) -> u64;

    /// Whether two keys are equal under this strategy
    fn equate(&self, a: &Q, b: &Q) -> bool;
}

/// Default strategy: the key's own `Hash` and `Eq` implementations
#[derive(Clone, Default)]
pub struct ValueKey<H = ahash::RandomState> {
    hash_builder: H,
}

impl ValueKey {
    /// Create a value strategy with a fresh random hasher state
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: BuildHasher> ValueKey<H> {
    /// Create a value strategy around a caller-supplied hasher state
    pub fn with_hasher(hash_builder: H) -> Self {
        ValueKey { hash_builder }
    }
}

impl<Q, H> KeyStrategy<Q> for ValueKey<H>
where
    Q: Hash + Eq + ?Sized,
    H: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn equate(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}

impl<H> fmt::Debug for ValueKey<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueKey")
    }
}

/// String strategy that skips characters failing a predicate and transforms
/// the rest through an editor before hashing or comparing
///
/// Strings differing only in filtered-out or editor-normalized characters
/// hash identically and compare equal, so `"Hello!"` and `"hello"` are the
/// same key under [`FilteredKey::letters_ignoring_case`].
#[derive(Clone)]
pub struct FilteredKey<F = fn(char) -> bool, E = fn(char) -> char> {
    filter: F,
    edit: E,
    hash_builder: ahash::RandomState,
}

impl<F, E> FilteredKey<F, E>
where
    F: Fn(char) -> bool,
    E: Fn(char) -> char,
{
    /// Create a filtered strategy from a character predicate and editor
    pub fn new(filter: F, edit: E) -> Self {
        FilteredKey {
            filter,
            edit,
            hash_builder: ahash::RandomState::new(),
        }
    }

    #[inline]
    fn significant<'a>(&'a self, s: &'a str) -> impl Iterator<Item = char> + 'a {
        s.chars().filter(move |c| (self.filter)(*c)).map(move |c| (self.edit)(c))
    }
}

impl FilteredKey {
    /// Preset: only alphabetic characters are significant, compared ASCII-uppercased
    pub fn letters_ignoring_case() -> Self {
        FilteredKey {
            filter: |c: char| c.is_alphabetic(),
            edit: |c: char| c.to_ascii_uppercase(),
            hash_builder: ahash::RandomState::new(),
        }
    }
}

impl Default for FilteredKey {
    /// Identity filtering: every character significant and unedited
    fn default() -> Self {
        FilteredKey {
            filter: |_| true,
            edit: |c| c,
            hash_builder: ahash::RandomState::new(),
        }
    }
}

impl<F, E, Q> KeyStrategy<Q> for FilteredKey<F, E>
where
    F: Fn(char) -> bool,
    E: Fn(char) -> char,
    Q: AsRef<str> + ?Sized,
{
    fn hash_key(&self, key: &Q) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        for c in self.significant(key.as_ref()) {
            hasher.write_u32(c as u32);
        }
        hasher.finish()
    }

    fn equate(&self, a: &Q, b: &Q) -> bool {
        self.significant(a.as_ref()).eq(self.significant(b.as_ref()))
    }
}

impl<F, E> fmt::Debug for FilteredKey<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FilteredKey")
    }
}

/// Key derivation for records stored whole but compared by one field
///
/// The extractor runs on every comparison, so it must be pure and O(1):
/// return a reference into the record, never compute a fresh key.
///
/// # Examples
///
/// ```rust
/// use tessera::KeyExtract;
///
/// struct User { id: u64, name: String }
/// struct ById;
///
/// impl KeyExtract<User> for ById {
///     type Key = u64;
///     fn extract<'a>(&self, record: &'a User) -> &'a u64 {
///         &record.id
///     }
/// }
/// # let _ = (ById, User { id: 1, name: String::new() });
/// ```
pub trait KeyExtract<T> {
    /// The derived key type
    type Key: Hash + Eq + ?Sized;

    /// Borrow the comparison key out of a stored record
    fn extract<'a>(&self, record: &'a T) -> &'a Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_key_matches_native_equality() {
        let strategy = ValueKey::new();
        assert!(strategy.equate(&42u32, &42u32));
        assert!(!strategy.equate(&42u32, &7u32));
        assert_eq!(strategy.hash_key(&42u32), strategy.hash_key(&42u32));
    }

    #[test]
    fn test_value_key_borrowed_str_hash_agrees_with_owned() {
        let strategy = ValueKey::new();
        let owned = String::from("key");
        let h_owned: u64 = KeyStrategy::<str>::hash_key(&strategy, owned.as_str());
        let h_borrowed: u64 = KeyStrategy::<str>::hash_key(&strategy, "key");
        assert_eq!(h_owned, h_borrowed);
    }

    #[test]
    fn test_filtered_key_ignores_filtered_chars() {
        let strategy = FilteredKey::letters_ignoring_case();
        assert!(KeyStrategy::<str>::equate(&strategy, "Hello!", "hello"));
        assert!(KeyStrategy::<str>::equate(&strategy, "HELLO", "h-e-l-l-o 123"));
        assert!(!KeyStrategy::<str>::equate(&strategy, "hello", "world"));
        assert_eq!(
            KeyStrategy::<str>::hash_key(&strategy, "Hello!"),
            KeyStrategy::<str>::hash_key(&strategy, "HELLO"),
        );
    }

    #[test]
    fn test_filtered_key_all_filtered_strings_equal() {
        let strategy = FilteredKey::letters_ignoring_case();
        // Nothing significant on either side: equal, same hash.
        assert!(KeyStrategy::<str>::equate(&strategy, "123", "!?"));
        assert_eq!(
            KeyStrategy::<str>::hash_key(&strategy, "123"),
            KeyStrategy::<str>::hash_key(&strategy, ""),
        );
    }

    #[test]
    fn test_filtered_key_default_is_identity() {
        let strategy = FilteredKey::default();
        assert!(KeyStrategy::<str>::equate(&strategy, "a b", "a b"));
        assert!(!KeyStrategy::<str>::equate(&strategy, "A", "a"));
    }

    #[test]
    fn test_key_extract_by_field() {
        struct Record {
            id: u32,
            #[allow(dead_code)]
            payload: &'static str,
        }
        struct ById;
        impl KeyExtract<Record> for ById {
            type Key = u32;
            fn extract<'a>(&self, record: &'a Record) -> &'a u32 {
                &record.id
            }
        }

        let a = Record { id: 7, payload: "x" };
        assert_eq!(*ById.extract(&a), 7);
    }
}
