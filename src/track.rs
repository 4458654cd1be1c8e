//! Track records and genre classification.
//!
//! A [`Track`] is one catalogued song with metadata and mutable play
//! statistics. Every index structure in the crate refers to tracks by their
//! string id; the owning set lives in [`crate::lookup::Library`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

lazy_static::lazy_static! {
    /// Genres considered calming for mood-based auto-replay.
    /// Matched case-insensitively against the track's genre tag.
    static ref CALMING_GENRES: HashSet<&'static str> =
        ["jazz", "classical", "ambient", "chill", "lo-fi", "lofi"]
            .into_iter()
            .collect();
}

/// One catalogued track with metadata and play statistics.
///
/// `id` and `added_seq` are immutable once created; `rating` and
/// `play_count` are updated in place by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identity across the owned set.
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Free-form genre tag.
    pub genre: String,
    /// Duration in seconds.
    pub duration_secs: u32,
    /// 0 = unrated, otherwise 1-5 stars.
    pub rating: u8,
    /// Cumulative completed plays.
    pub play_count: u32,
    /// Monotonic insertion stamp assigned by the engine. Larger values are
    /// newer; used for "recently added" ordering and ranking tie-breaks.
    pub added_seq: u64,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
        rating: u8,
        genre: impl Into<String>,
        added_seq: u64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            genre: genre.into(),
            duration_secs,
            rating,
            play_count: 0,
            added_seq,
        }
    }

    /// Whether the track's genre is in the fixed calming set.
    #[must_use]
    pub fn is_calming(&self) -> bool {
        CALMING_GENRES.contains(self.genre.to_lowercase().as_str())
    }

    /// Whether the track currently carries a 1-5 star rating.
    #[must_use]
    pub fn is_rated(&self) -> bool {
        (1..=5).contains(&self.rating)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} [{}] ({}s) [{} plays]",
            self.title, self.artist, self.genre, self.duration_secs, self.play_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(genre: &str) -> Track {
        Track::new("t1", "Title", "Artist", 200, 0, genre, 1)
    }

    #[test]
    fn calming_genres_match_case_insensitively() {
        assert!(track("Jazz").is_calming());
        assert!(track("CLASSICAL").is_calming());
        assert!(track("Lo-Fi").is_calming());
        assert!(track("lofi").is_calming());
        assert!(!track("Rock").is_calming());
        assert!(!track("Unknown").is_calming());
    }

    #[test]
    fn rated_range_is_one_to_five() {
        let mut t = track("Rock");
        assert!(!t.is_rated());
        t.rating = 3;
        assert!(t.is_rated());
        t.rating = 6;
        assert!(!t.is_rated());
    }

    #[test]
    fn display_includes_stats() {
        let mut t = track("Rock");
        t.play_count = 2;
        assert_eq!(t.to_string(), "Title by Artist [Rock] (200s) [2 plays]");
    }
}
