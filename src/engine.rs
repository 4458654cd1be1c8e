//! Engine orchestration.
//!
//! [`Engine`] owns every structure in the crate and fans each mutation out
//! to the indices that must observe it, so that from the caller's point of
//! view all of them stay consistent: the playlist, the identity indices,
//! the rating tree, the play history, the skip tracker and the replay
//! selector never drift apart. Single-threaded by design; every failure
//! path is checked before anything is mutated.

use crate::history::History;
use crate::lookup::Library;
use crate::playlist::Playlist;
use crate::rating::RatingTree;
use crate::replay::ReplaySelector;
use crate::skipped::{SkipTracker, DEFAULT_CAPACITY};
use crate::sorter::{self, SortAlgorithm, SortCriterion};
use crate::track::Track;
use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tunables for an engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many skipped ids the recency tracker remembers.
    pub skip_capacity: usize,
    /// Whether end-of-playlist triggers calming auto-replay.
    pub auto_replay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            skip_capacity: DEFAULT_CAPACITY,
            auto_replay: true,
        }
    }
}

/// Read-only dashboard snapshot; purely derived, no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Up to five longest tracks, duration descending.
    pub top_longest: Vec<Track>,
    /// Up to five most recently played tracks, newest first.
    pub recently_played: Vec<Track>,
    /// Track count per rating 1-5 (absent ratings report 0).
    pub counts_by_rating: HashMap<u8, usize>,
    pub total_tracks: usize,
    pub playlist_size: usize,
}

/// The catalogue-and-playback engine.
#[derive(Debug, Default)]
pub struct Engine {
    library: Library,
    playlist: Playlist,
    history: History,
    ratings: RatingTree,
    skipped: SkipTracker,
    replay: ReplaySelector,
    current: Option<String>,
    next_seq: u64,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut replay = ReplaySelector::new();
        replay.set_enabled(config.auto_replay);
        Self {
            skipped: SkipTracker::with_capacity(config.skip_capacity),
            replay,
            config: config.clone(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- catalogue mutation ------------------------------------------------

    /// Add a new track: owned set, playlist tail, identity indices, and the
    /// rating tree when `rating` is 1-5. Errors on a duplicate id without
    /// touching any structure.
    pub fn add_track(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
        rating: u8,
        genre: impl Into<String>,
    ) -> Result<&Track> {
        let id = id.into();
        let rating = if (1..=5).contains(&rating) { rating } else { 0 };
        let track = Track::new(
            id.clone(),
            title,
            artist,
            duration_secs,
            rating,
            genre,
            self.next_seq,
        );

        self.library.insert(track)?;
        self.next_seq += 1;
        self.playlist.push_back(id.clone());
        if rating > 0 {
            self.ratings.insert(id.clone(), rating);
        }
        debug!("added track {id}");
        Ok(self.library.get(&id).unwrap_or_else(|| unreachable!("track just inserted")))
    }

    /// Set a 1-5 star rating on an existing track. Re-rating removes the
    /// stale rating-tree entry before inserting the new one, so the track
    /// always sits in exactly one bucket. False (no-op) on an unknown id or
    /// an out-of-range rating.
    pub fn rate(&mut self, id: &str, rating: u8) -> bool {
        if !(1..=5).contains(&rating) || !self.library.contains(id) {
            return false;
        }

        self.ratings.remove_id(id);
        self.ratings.insert(id.to_string(), rating);
        if let Some(track) = self.library.get_mut(id) {
            track.rating = rating;
        }
        debug!("rated {id} at {rating}");
        true
    }

    /// Remove the playlist entry at `index`. The track stays in the
    /// catalogue and every other index. False when out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        match self.playlist.remove_at(index) {
            Some(id) => {
                debug!("removed playlist entry {index} ({id})");
                true
            }
            None => false,
        }
    }

    /// Remove a track everywhere: playlist, rating tree, skip tracker,
    /// replay statistics, and finally the owning set. History entries are
    /// discarded lazily by [`Engine::undo_last_play`]. False on unknown id.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        if !self.library.contains(id) {
            return false;
        }

        if let Some(pos) = self.playlist.snapshot().iter().position(|entry| entry == id) {
            self.playlist.remove_at(pos);
        }
        self.ratings.remove_id(id);
        self.skipped.forget(id);
        self.replay.forget(id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.library.remove(id);
        info!("removed track {id} from all indices");
        true
    }

    /// Reposition a playlist entry. False on invalid or equal indices.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        self.playlist.move_to(from, to)
    }

    /// Reverse the playing order in place.
    pub fn reverse(&mut self) {
        self.playlist.reverse();
    }

    /// Sort the playlist by `criterion` with the chosen algorithm: snapshot
    /// the order, sort the snapshot, install it back.
    pub fn sort(&mut self, criterion: SortCriterion, algorithm: SortAlgorithm) {
        let mut tracks: Vec<&Track> = self
            .playlist
            .snapshot()
            .iter()
            .filter_map(|id| self.library.get(id))
            .collect();
        sorter::sort(&mut tracks, criterion, algorithm);
        let order: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        self.playlist.rebuild_from(order);
        debug!("playlist sorted by {criterion:?} via {algorithm:?}");
    }

    // ---- playback state machine --------------------------------------------

    /// Play a track by id: set it current, push history, bump play counts.
    /// `None` when the id is unknown (not-found is never fatal).
    pub fn play(&mut self, id: &str) -> Option<&Track> {
        if !self.library.contains(id) {
            debug!("play: unknown id {id}");
            return None;
        }
        if self.skipped.contains(id) {
            warn!("playing {id} although it was recently skipped");
        }

        self.current = Some(id.to_string());
        self.history.push(id);
        self.replay.record_play(id);
        let track = self.library.get_mut(id)?;
        track.play_count += 1;
        info!("now playing {track}");
        Some(&*track)
    }

    /// Skip the current track, recording it in the recency tracker and
    /// returning to the idle state. `None` when nothing is playing.
    pub fn skip(&mut self) -> Option<String> {
        let id = self.current.take()?;
        self.skipped.record(id.clone());
        info!("skipped {id} ({}/{})", self.skipped.len(), self.skipped.capacity());
        Some(id)
    }

    /// Play the first playlist track that was not recently skipped.
    ///
    /// If every track was recently skipped and the playlist is non-empty,
    /// the first positional track plays anyway (forward progress beats
    /// skip-avoidance). On an empty playlist the replay selector is asked
    /// for a calming fallback; `Some` means a track is playing, `None`
    /// means playback has truly ended.
    pub fn auto_play_next(&mut self) -> Option<String> {
        let order = self.playlist.snapshot();

        for id in &order {
            if !self.skipped.contains(id) {
                self.play(id)?;
                return Some(id.clone());
            }
        }

        if let Some(first) = order.first() {
            info!("all playlist tracks recently skipped, replaying {first}");
            self.play(first)?;
            return Some(first.clone());
        }

        self.handle_playlist_end()
    }

    /// End-of-playlist handling: rebuild the replay queue over the whole
    /// catalogue and play its next pick, if any.
    fn handle_playlist_end(&mut self) -> Option<String> {
        info!("playlist ended");
        let tracks: Vec<&Track> = self.library.tracks().collect();
        self.replay.setup_auto_replay(&tracks);

        let id = self.replay.next_replay()?;
        self.play(&id)?;
        Some(id)
    }

    /// Pop the history stack and re-append that track to the playlist tail
    /// (the original position is not restored). Popped ids of tracks that
    /// were removed from the catalogue are discarded.
    pub fn undo_last_play(&mut self) -> Option<String> {
        loop {
            let id = self.history.pop()?;
            if self.library.contains(&id) {
                self.playlist.push_back(id.clone());
                info!("re-appended {id} to playlist");
                return Some(id);
            }
            debug!("undo: dropping history entry for removed track {id}");
        }
    }

    // ---- queries -----------------------------------------------------------

    #[must_use]
    pub fn track(&self, id: &str) -> Option<&Track> {
        self.library.get(id)
    }

    #[must_use]
    pub fn tracks_by_title(&self, title: &str) -> Vec<&Track> {
        self.library
            .ids_by_title(title)
            .iter()
            .filter_map(|id| self.library.get(id))
            .collect()
    }

    #[must_use]
    pub fn tracks_by_rating(&self, rating: u8) -> Vec<&Track> {
        self.ratings
            .bucket(rating)
            .iter()
            .filter_map(|id| self.library.get(id))
            .collect()
    }

    /// Tracks grouped by genre tag, each group in `added_seq` order.
    #[must_use]
    pub fn tracks_by_genre(&self) -> HashMap<String, Vec<&Track>> {
        let mut groups: HashMap<String, Vec<&Track>> = HashMap::new();
        for track in self.library.tracks() {
            groups.entry(track.genre.clone()).or_default().push(track);
        }
        for group in groups.values_mut() {
            group.sort_by_key(|t| t.added_seq);
        }
        groups
    }

    /// Every catalogued track, in unspecified order.
    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.library.tracks()
    }

    /// The playing order as resolved track references.
    #[must_use]
    pub fn playlist_tracks(&self) -> Vec<&Track> {
        self.playlist
            .snapshot()
            .iter()
            .filter_map(|id| self.library.get(id))
            .collect()
    }

    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.library.get(self.current.as_deref()?)
    }

    #[must_use]
    pub fn recently_skipped(&self) -> Vec<String> {
        self.skipped.iter().map(str::to_owned).collect()
    }

    #[must_use]
    pub fn recently_played(&self, n: usize) -> Vec<&Track> {
        self.history
            .recent(n)
            .iter()
            .filter_map(|id| self.library.get(id))
            .collect()
    }

    #[must_use]
    pub fn playlist_len(&self) -> usize {
        self.playlist.len()
    }

    #[must_use]
    pub fn total_tracks(&self) -> usize {
        self.library.len()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn clear_skipped(&mut self) {
        self.skipped.clear();
    }

    pub fn set_auto_replay(&mut self, enabled: bool) {
        self.config.auto_replay = enabled;
        self.replay.set_enabled(enabled);
    }

    #[must_use]
    pub fn auto_replay_enabled(&self) -> bool {
        self.replay.is_enabled()
    }

    #[must_use]
    pub fn replay_cycles(&self) -> u32 {
        self.replay.cycles()
    }

    #[must_use]
    pub fn top_played(&self, n: usize) -> Vec<(String, u32)> {
        self.replay.top_played(n)
    }

    /// Derive the dashboard snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut all: Vec<&Track> = self.library.tracks().collect();
        sorter::sort(&mut all, SortCriterion::DurationDesc, SortAlgorithm::Quick);
        let top_longest = all.into_iter().take(5).cloned().collect();

        Snapshot {
            top_longest,
            recently_played: self.recently_played(5).into_iter().cloned().collect(),
            counts_by_rating: self.ratings.counts(),
            total_tracks: self.library.len(),
            playlist_size: self.playlist.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_samples() -> Engine {
        let mut engine = Engine::new();
        engine
            .add_track("001", "Bohemian Rhapsody", "Queen", 355, 5, "Rock")
            .unwrap();
        engine
            .add_track("002", "Imagine", "John Lennon", 183, 5, "Pop")
            .unwrap();
        engine
            .add_track("003", "Billie Jean", "Michael Jackson", 294, 4, "Pop")
            .unwrap();
        engine
            .add_track("006", "Miles Runs the Voodoo Down", "Miles Davis", 420, 4, "Jazz")
            .unwrap();
        engine
    }

    #[test]
    fn add_track_updates_all_indices() {
        let engine = engine_with_samples();
        assert_eq!(engine.total_tracks(), 4);
        assert_eq!(engine.playlist_len(), 4);
        assert_eq!(engine.track("001").unwrap().title, "Bohemian Rhapsody");
        assert_eq!(engine.tracks_by_rating(5).len(), 2);
        assert_eq!(engine.tracks_by_title("Imagine").len(), 1);
    }

    #[test]
    fn duplicate_id_is_rejected_atomically() {
        let mut engine = engine_with_samples();
        assert!(engine.add_track("001", "Clone", "X", 100, 3, "Rock").is_err());
        assert_eq!(engine.total_tracks(), 4);
        assert_eq!(engine.playlist_len(), 4);
        assert!(engine.tracks_by_title("Clone").is_empty());
        // Rating tree untouched: still two 5-star and two 4-star tracks.
        let counts = engine.snapshot().counts_by_rating;
        assert_eq!(counts[&3], 0);
    }

    #[test]
    fn out_of_range_rating_is_stored_unrated() {
        let mut engine = Engine::new();
        engine.add_track("x", "T", "A", 100, 9, "Rock").unwrap();
        assert_eq!(engine.track("x").unwrap().rating, 0);
        assert!(engine.tracks_by_rating(5).is_empty());
    }

    #[test]
    fn re_rating_moves_between_buckets() {
        let mut engine = engine_with_samples();
        assert!(engine.rate("001", 2));

        assert_eq!(engine.track("001").unwrap().rating, 2);
        let five: Vec<_> = engine.tracks_by_rating(5).iter().map(|t| t.id.clone()).collect();
        assert_eq!(five, ["002"]);
        let two: Vec<_> = engine.tracks_by_rating(2).iter().map(|t| t.id.clone()).collect();
        assert_eq!(two, ["001"]);

        let counts = engine.snapshot().counts_by_rating;
        let rated: usize = counts.values().sum();
        assert_eq!(rated, 4, "every rated track sits in exactly one bucket");
    }

    #[test]
    fn rate_rejects_bad_input() {
        let mut engine = engine_with_samples();
        assert!(!engine.rate("001", 0));
        assert!(!engine.rate("001", 6));
        assert!(!engine.rate("missing", 3));
        assert_eq!(engine.track("001").unwrap().rating, 5);
    }

    #[test]
    fn play_and_skip_state_machine() {
        let mut engine = engine_with_samples();
        assert!(engine.play("missing").is_none());
        assert!(engine.current_track().is_none());

        let played = engine.play("001").unwrap();
        assert_eq!(played.play_count, 1);
        assert_eq!(engine.current_track().unwrap().id, "001");

        assert_eq!(engine.skip().as_deref(), Some("001"));
        assert!(engine.current_track().is_none());
        assert_eq!(engine.recently_skipped(), ["001"]);

        // Skipping while idle is a no-op.
        assert_eq!(engine.skip(), None);
    }

    #[test]
    fn auto_play_prefers_unskipped_tracks() {
        let mut engine = Engine::new();
        engine.add_track("a", "A", "X", 100, 0, "Rock").unwrap();
        engine.add_track("b", "B", "X", 100, 0, "Rock").unwrap();
        engine.add_track("c", "C", "X", 100, 0, "Rock").unwrap();

        engine.play("a");
        engine.skip();
        engine.play("b");
        engine.skip();

        // a and b recently skipped: c must be chosen.
        assert_eq!(engine.auto_play_next().as_deref(), Some("c"));
    }

    #[test]
    fn auto_play_falls_back_to_first_when_all_skipped() {
        let mut engine = Engine::new();
        for id in ["a", "b", "c"] {
            engine.add_track(id, id.to_uppercase(), "X", 100, 0, "Rock").unwrap();
            engine.play(id);
            engine.skip();
        }
        assert_eq!(engine.auto_play_next().as_deref(), Some("a"));
    }

    #[test]
    fn empty_playlist_triggers_calming_replay() {
        let mut engine = Engine::new();
        engine.add_track("j", "Smooth", "X", 200, 0, "Jazz").unwrap();
        engine.play("j");
        // Empty the playlist; the catalogue still owns the track.
        assert!(engine.remove_at(0));
        assert_eq!(engine.playlist_len(), 0);

        assert_eq!(engine.auto_play_next().as_deref(), Some("j"));
        assert_eq!(engine.replay_cycles(), 1);
    }

    #[test]
    fn empty_playlist_without_calming_plays_ends() {
        let mut engine = Engine::new();
        engine.add_track("r", "Loud", "X", 200, 0, "Rock").unwrap();
        engine.play("r");
        engine.remove_at(0);

        assert_eq!(engine.auto_play_next(), None);
    }

    #[test]
    fn undo_re_appends_to_tail() {
        let mut engine = engine_with_samples();
        engine.play("002");
        engine.remove_at(1); // drop "002" from the playlist
        assert_eq!(engine.playlist_len(), 3);

        assert_eq!(engine.undo_last_play().as_deref(), Some("002"));
        let order: Vec<_> = engine.playlist_tracks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(order.last().map(String::as_str), Some("002"));
    }

    #[test]
    fn undo_skips_removed_tracks() {
        let mut engine = engine_with_samples();
        engine.play("001");
        engine.play("002");
        assert!(engine.remove_by_id("002"));

        // "002" is gone; undo must fall through to "001".
        assert_eq!(engine.undo_last_play().as_deref(), Some("001"));
    }

    #[test]
    fn remove_by_id_cascades_everywhere() {
        let mut engine = engine_with_samples();
        engine.play("001");
        engine.skip();

        assert!(engine.remove_by_id("001"));
        assert!(engine.track("001").is_none());
        assert!(engine.tracks_by_rating(5).iter().all(|t| t.id != "001"));
        assert_eq!(engine.playlist_len(), 3);
        assert!(engine.tracks_by_title("Bohemian Rhapsody").is_empty());
        assert!(!engine.remove_by_id("001"));
    }

    #[test]
    fn removed_track_leaves_the_skip_tracker() {
        let mut engine = engine_with_samples();
        engine.play("001");
        engine.skip();
        assert_eq!(engine.recently_skipped(), ["001"]);

        assert!(engine.remove_by_id("001"));
        assert!(engine.recently_skipped().is_empty());
    }

    #[test]
    fn readded_id_starts_with_clean_skip_state() {
        let mut engine = Engine::new();
        engine.add_track("x", "First", "A", 100, 0, "Rock").unwrap();
        engine.add_track("y", "Second", "A", 100, 0, "Rock").unwrap();
        engine.play("x");
        engine.skip();
        assert!(engine.remove_by_id("x"));

        // A new track under the recycled id must not inherit skip state:
        // moved to the front, it wins auto-play over the never-skipped "y".
        engine.add_track("x", "Replacement", "A", 120, 0, "Rock").unwrap();
        assert!(engine.move_track(1, 0));
        assert_eq!(engine.auto_play_next().as_deref(), Some("x"));
    }

    #[test]
    fn config_bounds_the_skip_tracker() {
        let config = EngineConfig {
            skip_capacity: 2,
            auto_replay: false,
        };
        let mut engine = Engine::with_config(&config);
        for id in ["a", "b", "c"] {
            engine.add_track(id, id.to_uppercase(), "X", 100, 0, "Rock").unwrap();
            engine.play(id);
            engine.skip();
        }

        // Oldest entry aged out at the configured bound.
        assert_eq!(engine.recently_skipped(), ["c", "b"]);
        assert_eq!(engine.config().skip_capacity, 2);
        assert!(!engine.auto_replay_enabled());
    }

    #[test]
    fn remove_at_leaves_other_indices_alone() {
        let mut engine = engine_with_samples();
        assert!(engine.remove_at(0));
        assert_eq!(engine.playlist_len(), 3);
        // Still in the catalogue and the rating tree.
        assert!(engine.track("001").is_some());
        assert!(engine.tracks_by_rating(5).iter().any(|t| t.id == "001"));
        assert!(!engine.remove_at(10));
    }

    #[test]
    fn sort_installs_new_playlist_order() {
        let mut engine = engine_with_samples();
        engine.sort(SortCriterion::DurationAsc, SortAlgorithm::Merge);
        let order: Vec<_> = engine.playlist_tracks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, ["002", "003", "001", "006"]);

        engine.sort(SortCriterion::RecentlyAdded, SortAlgorithm::Quick);
        let order: Vec<_> = engine.playlist_tracks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, ["006", "003", "002", "001"]);
    }

    #[test]
    fn move_and_reverse_manipulate_order() {
        let mut engine = engine_with_samples();
        assert!(engine.move_track(0, 3));
        let order: Vec<_> = engine.playlist_tracks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, ["002", "003", "006", "001"]);

        engine.reverse();
        let order: Vec<_> = engine.playlist_tracks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, ["001", "006", "003", "002"]);

        assert!(!engine.move_track(2, 2));
    }

    #[test]
    fn snapshot_reports_derived_state() {
        let mut engine = engine_with_samples();
        engine.play("001");
        engine.play("006");

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.total_tracks, 4);
        assert_eq!(snapshot.playlist_size, 4);
        assert_eq!(snapshot.top_longest.first().unwrap().id, "006");
        assert_eq!(snapshot.recently_played.first().unwrap().id, "006");
        assert_eq!(snapshot.counts_by_rating[&5], 2);
        assert_eq!(snapshot.counts_by_rating[&1], 0);

        // Snapshot must not mutate anything.
        let again = engine.snapshot();
        assert_eq!(again.total_tracks, 4);
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let engine = engine_with_samples();
        let json = serde_json::to_string(&engine.snapshot()).unwrap();
        assert!(json.contains("\"total_tracks\":4"));
    }

    #[test]
    fn genre_grouping_orders_by_insertion() {
        let engine = engine_with_samples();
        let groups = engine.tracks_by_genre();
        assert_eq!(groups["Pop"].len(), 2);
        assert_eq!(groups["Pop"][0].id, "002");
        assert_eq!(groups["Rock"].len(), 1);
    }
}
