//! Bounded history of recorded events.
//!
//! A [`HistoryRing`] keeps at most `capacity` entries; pushing onto a full
//! ring silently drops the oldest entry. A capacity of zero disables
//! recording entirely.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of entries, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryRing<E> {
    entries: VecDeque<E>,
    capacity: usize,
}

impl<E> Default for HistoryRing<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<E> HistoryRing<E> {
    /// Create a ring that keeps up to `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Whether entries are recorded at all.
    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an entry, evicting the oldest one when full.
    pub fn push(&mut self, entry: E) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Drop every entry and change the capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.entries.clear();
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &E> + ExactSizeIterator {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Clone> HistoryRing<E> {
    /// Copy of the entries, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<E> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_records_nothing() {
        let mut ring = HistoryRing::new(0);
        ring.push(1);
        assert!(ring.is_empty());
        assert!(!ring.is_enabled());
    }

    #[test]
    fn evicts_oldest_on_overflow() {
        let mut ring = HistoryRing::new(3);
        for i in 0..5 {
            ring.push(i);
        }
        assert_eq!(ring.to_vec(), vec![2, 3, 4]);
        assert_eq!(ring.last(), Some(&4));
    }

    #[test]
    fn reset_clears_and_resizes() {
        let mut ring = HistoryRing::new(2);
        ring.push('a');
        ring.push('b');
        ring.reset(1);
        assert!(ring.is_empty());
        ring.push('c');
        ring.push('d');
        assert_eq!(ring.to_vec(), vec!['d']);
    }

    proptest::proptest! {
        #[test]
        fn never_exceeds_capacity(capacity in 0usize..16, pushes in 0usize..64) {
            let mut ring = HistoryRing::new(capacity);
            for i in 0..pushes {
                ring.push(i);
                proptest::prop_assert!(ring.len() <= capacity);
            }
            // Newest entries survive.
            if capacity > 0 && pushes > 0 {
                proptest::prop_assert_eq!(ring.last(), Some(&(pushes - 1)));
            }
        }
    }
}
