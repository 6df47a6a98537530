//! Min-priority frontier queue over lattice indices.
//!
//! Entries are never updated in place: a cheaper route pushes a fresh entry
//! and the stale one is discarded when it surfaces, by checking the node's
//! status. Equal priorities pop the lowest lattice index first, which keeps
//! every search fully deterministic.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

const INITIAL_QUEUE_SIZE: usize = 100;

/// Reference into the lattice, ordered for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Entry {
    priority: i64,
    idx: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest priority, then
        // smallest index, first.
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(INITIAL_QUEUE_SIZE),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, idx: usize, priority: i64) {
        self.heap.push(Entry { priority, idx });
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.idx)
    }

    /// Pop the best entry together with the priority it was pushed with,
    /// so callers can recognise entries made stale by a later push.
    #[inline]
    pub(crate) fn pop_entry(&mut self) -> Option<(usize, i64)> {
        self.heap.pop().map(|e| (e.idx, e.priority))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_cheapest_first() {
        let mut q = Frontier::new();
        q.push(3, 50);
        q.push(1, 10);
        q.push(2, 30);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn ties_pop_lowest_index_first() {
        let mut q = Frontier::new();
        q.push(9, 5);
        q.push(4, 5);
        q.push(7, 5);
        q.push(8, 1);
        assert_eq!(q.pop(), Some(8));
        assert_eq!(q.pop(), Some(4));
        assert_eq!(q.pop(), Some(7));
        assert_eq!(q.pop(), Some(9));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut q = Frontier::new();
        q.push(2, 40);
        q.push(2, 20);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn pop_entry_reports_priority() {
        let mut q = Frontier::new();
        q.push(5, 70);
        q.push(5, 20);
        assert_eq!(q.pop_entry(), Some((5, 20)));
        assert_eq!(q.pop_entry(), Some((5, 70)));
        assert_eq!(q.pop_entry(), None);
    }

    #[test]
    fn negative_priorities_sort_first() {
        let mut q = Frontier::new();
        q.push(1, 0);
        q.push(2, -300);
        assert_eq!(q.pop(), Some(2));
    }
}
