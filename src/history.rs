//! LIFO playback history.
//!
//! Records track ids in play order; popping the stack conceptually undoes
//! the most recent play.

/// Stack of played track ids, most recent on top.
#[derive(Debug, Default)]
pub struct History {
    stack: Vec<String>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a play. O(1).
    pub fn push(&mut self, track_id: impl Into<String>) {
        self.stack.push(track_id.into());
    }

    /// Pop the most recently played id. O(1).
    pub fn pop(&mut self) -> Option<String> {
        self.stack.pop()
    }

    /// Up to `n` most recently played ids, most recent first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<String> {
        self.stack.iter().rev().take(n).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
