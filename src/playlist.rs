//! The canonical playback order.
//!
//! [`Playlist`] is a doubly linked sequence of track ids stored in an arena
//! of indexed slots: links are slot handles, not pointers, so removal and
//! reordering never invalidate other entries. Appending is O(1); positional
//! operations walk from whichever end is nearer, bounding the traversal to
//! n/2 steps.

use log::trace;

#[derive(Debug)]
struct Slot {
    track_id: String,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Ordered sequence of track ids backed by a slot arena.
#[derive(Debug, Default)]
pub struct Playlist {
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl Playlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a track id at the tail. O(1).
    pub fn push_back(&mut self, track_id: impl Into<String>) {
        let slot = Slot {
            track_id: track_id.into(),
            prev: self.tail,
            next: None,
        };
        let handle = match self.free.pop() {
            Some(h) => {
                self.slots[h] = Some(slot);
                h
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        match self.tail {
            Some(t) => {
                self.slot_mut(t).next = Some(handle);
            }
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;
    }

    /// The track id at `index`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        let handle = self.handle_at(index)?;
        Some(self.slot(handle).track_id.as_str())
    }

    /// Remove the entry at `index` and return its id. Out-of-range indices
    /// are a no-op returning `None`. O(n).
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        let handle = self.handle_at(index)?;
        Some(self.detach(handle))
    }

    /// Reposition the element at `from` so it ends up at index `to`,
    /// preserving the relative order of all other elements. Returns false
    /// (no-op) when either index is out of range or they are equal. O(n).
    pub fn move_to(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.len || to >= self.len {
            return false;
        }

        let handle = match self.handle_at(from) {
            Some(h) => h,
            None => return false,
        };
        let id = self.detach(handle);

        // The sequence is one shorter now; `to` is still valid because the
        // original bounds check ran against the full length.
        if to >= self.len {
            self.push_back(id);
        } else {
            self.insert_before_index(to, id);
        }
        trace!("moved playlist entry {from} -> {to}");
        true
    }

    /// Reverse the whole sequence in place by swapping every slot's links. O(n).
    pub fn reverse(&mut self) {
        if self.len <= 1 {
            return;
        }

        let mut cursor = self.head;
        while let Some(h) = cursor {
            let slot = self.slot_mut(h);
            std::mem::swap(&mut slot.prev, &mut slot.next);
            // After the swap the old `next` is found in `prev`.
            cursor = slot.prev;
        }
        std::mem::swap(&mut self.head, &mut self.tail);
    }

    /// The current order as an owned list of ids. O(n).
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.len);
        let mut cursor = self.head;
        while let Some(h) = cursor {
            let slot = self.slot(h);
            ids.push(slot.track_id.clone());
            cursor = slot.next;
        }
        ids
    }

    /// Replace the entire order with `ids`. O(n).
    pub fn rebuild_from(&mut self, ids: impl IntoIterator<Item = String>) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        for id in ids {
            self.push_back(id);
        }
    }

    fn slot(&self, handle: usize) -> &Slot {
        self.slots[handle].as_ref().unwrap_or_else(|| unreachable!("stale slot handle {handle}"))
    }

    fn slot_mut(&mut self, handle: usize) -> &mut Slot {
        self.slots[handle].as_mut().unwrap_or_else(|| unreachable!("stale slot handle {handle}"))
    }

    /// Handle of the slot at a positional index, walking from the nearer end.
    fn handle_at(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }

        if index < self.len / 2 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = self.slot(cursor?).next;
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in 0..(self.len - 1 - index) {
                cursor = self.slot(cursor?).prev;
            }
            cursor
        }
    }

    /// Unlink `handle` from the chain, recycle the slot, return the id.
    fn detach(&mut self, handle: usize) -> String {
        let slot = self.slots[handle]
            .take()
            .unwrap_or_else(|| unreachable!("stale slot handle {handle}"));

        match slot.prev {
            Some(p) => self.slot_mut(p).next = slot.next,
            None => self.head = slot.next,
        }
        match slot.next {
            Some(n) => self.slot_mut(n).prev = slot.prev,
            None => self.tail = slot.prev,
        }

        self.free.push(handle);
        self.len -= 1;
        slot.track_id
    }

    /// Insert `id` immediately before the element currently at `index`.
    fn insert_before_index(&mut self, index: usize, id: String) {
        let target = self
            .handle_at(index)
            .unwrap_or_else(|| unreachable!("insert index {index} out of range"));
        let prev = self.slot(target).prev;

        let slot = Slot {
            track_id: id,
            prev,
            next: Some(target),
        };
        let handle = match self.free.pop() {
            Some(h) => {
                self.slots[h] = Some(slot);
                h
            }
            None => {
                self.slots.push(Some(slot));
                self.slots.len() - 1
            }
        };

        self.slot_mut(target).prev = Some(handle);
        match prev {
            Some(p) => self.slot_mut(p).next = Some(handle),
            None => self.head = Some(handle),
        }
        self.len += 1;
    }
}
