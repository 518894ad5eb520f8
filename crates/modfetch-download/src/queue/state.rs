//! Pure queue state for the scheduler.
//!
//! No I/O, no async, no locking: the caller ([`super::Work`]) owns the lock.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Keys ever registered plus items not yet handed to a worker.
pub struct WorkState<K, T> {
    seen: HashSet<K>,
    pending: VecDeque<T>,
}

impl<K: Eq + Hash, T> WorkState<K, T> {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            pending: VecDeque::new(),
        }
    }

    /// Register `item` under `key`.
    ///
    /// Returns `false` (and drops `item`) if `key` was registered before,
    /// whether that earlier item is pending, running or finished.
    pub fn add(&mut self, key: K, item: T) -> bool {
        if !self.seen.insert(key) {
            return false;
        }
        self.pending.push_back(item);
        true
    }

    /// Take the next item in registration order.
    pub fn next(&mut self) -> Option<T> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of distinct keys ever registered.
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}
