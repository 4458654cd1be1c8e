//! Bounded recently-skipped buffer.
//!
//! A small, order-significant, duplicate-free ring of track ids, front =
//! most recently skipped. Recording an id already present moves it to the
//! front without growing the buffer; past the capacity the oldest entry is
//! evicted from the back. All operations are O(capacity), which is fine
//! because the capacity is small and fixed.

use log::trace;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 10;

/// Tracker of the most recently skipped track ids.
#[derive(Debug)]
pub struct SkipTracker {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for SkipTracker {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SkipTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a skip. Dedups, pushes to the front, evicts past capacity.
    pub fn record(&mut self, track_id: impl Into<String>) {
        let id = track_id.into();
        if let Some(pos) = self.entries.iter().position(|entry| *entry == id) {
            self.entries.remove(pos);
        }
        self.entries.push_front(id);
        if self.entries.len() > self.capacity {
            let evicted = self.entries.pop_back();
            trace!("skip tracker evicted {evicted:?}");
        }
    }

    #[must_use]
    pub fn contains(&self, track_id: &str) -> bool {
        self.entries.iter().any(|entry| entry == track_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop one id from the buffer, wherever it sits. No-op when absent.
    pub fn forget(&mut self, track_id: &str) {
        self.entries.retain(|entry| entry != track_id);
    }

    /// Skipped ids, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
