//! Order index backings for the Ordered container variants
//!
//! An order index is a plain positional sequence of keys, one per live table
//! entry, recording iteration order independently of hash-derived slot
//! positions. It has no reverse key-to-position map; resolving a key's
//! position costs a linear scan, which is why the positional operations on
//! the Ordered containers are the cheap ones.

use std::cmp::Ordering;
use std::collections::VecDeque;

/// Positional key sequence backing an Ordered container
///
/// Implementations only manage positions; key semantics (hashing, equality)
/// stay with the owning container's strategy.
pub trait OrderIndex<K> {
    /// Number of recorded keys
    fn len(&self) -> usize;

    /// Whether no keys are recorded
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a key at the end of the sequence
    fn push(&mut self, key: K);

    /// Insert a key at position `at`, shifting later keys toward the end
    fn insert(&mut self, at: usize, key: K);

    /// Remove and return the key at position `at`
    fn remove_at(&mut self, at: usize) -> K;

    /// The key at position `at`
    fn get(&self, at: usize) -> &K;

    /// Replace the key at position `at`, returning the old one
    fn set(&mut self, at: usize, key: K) -> K;

    /// Position of the first key the predicate accepts
    fn position_of<F: FnMut(&K) -> bool>(&self, matches: F) -> Option<usize>;

    /// Sort the sequence in place by a comparator
    fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F);

    /// Forget every key
    fn clear(&mut self);

    /// Pre-allocate room for `additional` more keys
    fn reserve(&mut self, additional: usize);
}

/// Growable-array order index; the default backing
#[derive(Debug, Clone)]
pub struct VecOrder<K> {
    keys: Vec<K>,
}

impl<K> Default for VecOrder<K> {
    fn default() -> Self {
        VecOrder { keys: Vec::new() }
    }
}

impl<K> OrderIndex<K> for VecOrder<K> {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn push(&mut self, key: K) {
        self.keys.push(key);
    }

    fn insert(&mut self, at: usize, key: K) {
        self.keys.insert(at, key);
    }

    fn remove_at(&mut self, at: usize) -> K {
        self.keys.remove(at)
    }

    fn get(&self, at: usize) -> &K {
        &self.keys[at]
    }

    fn set(&mut self, at: usize, key: K) -> K {
        std::mem::replace(&mut self.keys[at], key)
    }

    fn position_of<F: FnMut(&K) -> bool>(&self, mut matches: F) -> Option<usize> {
        self.keys.iter().position(|k| matches(k))
    }

    fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F) {
        self.keys.sort_by(cmp);
    }

    fn clear(&mut self) {
        self.keys.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
    }
}

/// Circular-deque order index
///
/// Same contract over a `VecDeque`, trading slightly slower positional access
/// for O(1) removal at both ends - a better fit when the ordered container is
/// drained queue-style from the front.
#[derive(Debug, Clone)]
pub struct DequeOrder<K> {
    keys: VecDeque<K>,
}

impl<K> Default for DequeOrder<K> {
    fn default() -> Self {
        DequeOrder {
            keys: VecDeque::new(),
        }
    }
}

impl<K> OrderIndex<K> for DequeOrder<K> {
    fn len(&self) -> usize {
        self.keys.len()
    }

    fn push(&mut self, key: K) {
        self.keys.push_back(key);
    }

    fn insert(&mut self, at: usize, key: K) {
        self.keys.insert(at, key);
    }

    fn remove_at(&mut self, at: usize) -> K {
        self.keys
            .remove(at)
            .expect("position validated by the owning container")
    }

    fn get(&self, at: usize) -> &K {
        &self.keys[at]
    }

    fn set(&mut self, at: usize, key: K) -> K {
        std::mem::replace(&mut self.keys[at], key)
    }

    fn position_of<F: FnMut(&K) -> bool>(&self, mut matches: F) -> Option<usize> {
        self.keys.iter().position(|k| matches(k))
    }

    fn sort_by<F: FnMut(&K, &K) -> Ordering>(&mut self, cmp: F) {
        self.keys.make_contiguous().sort_by(cmp);
    }

    fn clear(&mut self) {
        self.keys.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<O: OrderIndex<u32> + Default>() {
        let mut order = O::default();
        assert!(order.is_empty());

        order.push(1);
        order.push(3);
        order.insert(1, 2);
        assert_eq!(order.len(), 3);
        assert_eq!(*order.get(0), 1);
        assert_eq!(*order.get(1), 2);
        assert_eq!(*order.get(2), 3);

        assert_eq!(order.position_of(|&k| k == 3), Some(2));
        assert_eq!(order.position_of(|&k| k == 9), None);

        assert_eq!(order.set(1, 20), 2);
        assert_eq!(order.remove_at(0), 1);
        assert_eq!(order.len(), 2);
        assert_eq!(*order.get(0), 20);

        order.push(5);
        order.sort_by(|a, b| b.cmp(a));
        assert_eq!(*order.get(0), 20);
        assert_eq!(*order.get(1), 5);
        assert_eq!(*order.get(2), 3);

        order.clear();
        assert!(order.is_empty());
    }

    #[test]
    fn test_vec_order_contract() {
        exercise::<VecOrder<u32>>();
    }

    #[test]
    fn test_deque_order_contract() {
        exercise::<DequeOrder<u32>>();
    }
}
