//! Frequency-ranked auto-replay selection.
//!
//! Tracks how often each id has been played and, when the playlist runs
//! out, offers a cyclic queue of the most-played calming-genre tracks so
//! playback can wind down instead of stopping. Ranking is play count
//! descending with newer tracks winning ties.

use crate::track::Track;
use log::{debug, info};
use std::collections::{HashMap, VecDeque};

/// How many calming tracks an auto-replay cycle holds.
const REPLAY_PICKS: usize = 3;

/// Play-count table plus the cyclic replay queue.
#[derive(Debug)]
pub struct ReplaySelector {
    play_counts: HashMap<String, u32>,
    queue: VecDeque<String>,
    enabled: bool,
    cycles: u32,
}

impl Default for ReplaySelector {
    fn default() -> Self {
        Self {
            play_counts: HashMap::new(),
            queue: VecDeque::new(),
            enabled: true,
            cycles: 0,
        }
    }
}

impl ReplaySelector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one play of `track_id`. O(1) average.
    pub fn record_play(&mut self, track_id: impl Into<String>) {
        *self.play_counts.entry(track_id.into()).or_insert(0) += 1;
    }

    /// Total recorded plays for an id (0 when never played).
    #[must_use]
    pub fn play_count(&self, track_id: &str) -> u32 {
        self.play_counts.get(track_id).copied().unwrap_or(0)
    }

    /// The `n` most-played calming tracks, play count descending, newer
    /// first on ties. Tracks that were never played do not qualify.
    #[must_use]
    pub fn top_calming(&self, tracks: &[&Track], n: usize) -> Vec<String> {
        let mut ranked: Vec<(&Track, u32)> = tracks
            .iter()
            .filter(|track| track.is_calming())
            .map(|track| (*track, self.play_count(&track.id)))
            .filter(|(_, count)| *count > 0)
            .collect();

        ranked.sort_by(|(a, count_a), (b, count_b)| {
            count_b
                .cmp(count_a)
                .then_with(|| b.added_seq.cmp(&a.added_seq))
        });

        ranked
            .into_iter()
            .take(n)
            .map(|(track, _)| track.id.clone())
            .collect()
    }

    /// Rebuild the cyclic queue from the top calming tracks. No-op when
    /// auto-replay is disabled or nothing qualifies.
    pub fn setup_auto_replay(&mut self, tracks: &[&Track]) {
        if !self.enabled {
            debug!("auto-replay disabled, skipping queue setup");
            return;
        }

        let picks = self.top_calming(tracks, REPLAY_PICKS);
        if picks.is_empty() {
            debug!("no calming tracks with plays, replay queue untouched");
            return;
        }

        self.queue = picks.into();
        self.cycles += 1;
        info!(
            "auto-replay cycle #{} ready with {} track(s)",
            self.cycles,
            self.queue.len()
        );
    }

    /// Next track of the cycle: pops the front and re-enqueues it at the
    /// back for an endless round-robin. `None` when the queue is empty.
    pub fn next_replay(&mut self) -> Option<String> {
        let id = self.queue.pop_front()?;
        self.queue.push_back(id.clone());
        Some(id)
    }

    /// The `n` most-played ids overall, count descending then id ascending.
    #[must_use]
    pub fn top_played(&self, n: usize) -> Vec<(String, u32)> {
        let mut totals: Vec<(String, u32)> = self
            .play_counts
            .iter()
            .map(|(id, count)| (id.clone(), *count))
            .collect();
        totals.sort_by(|(id_a, count_a), (id_b, count_b)| {
            count_b.cmp(count_a).then_with(|| id_a.cmp(id_b))
        });
        totals.truncate(n);
        totals
    }

    #[must_use]
    pub fn has_replay_tracks(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Drop any play-count record for a removed track.
    pub fn forget(&mut self, track_id: &str) {
        self.play_counts.remove(track_id);
        self.queue.retain(|entry| entry != track_id);
    }
}
