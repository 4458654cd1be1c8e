//! Identity indices and track ownership.
//!
//! [`Library`] owns the canonical track set: the id map is the owned set,
//! so the "id map is a bijection onto the owned tracks" invariant holds by
//! construction. A secondary title index maps a title to the ids sharing it
//! (duplicates allowed, insertion order preserved).

use crate::track::Track;
use anyhow::{bail, Result};
use std::collections::HashMap;

/// Hash-backed point lookups by id and by title; owns the tracks.
#[derive(Debug, Default)]
pub struct Library {
    by_id: HashMap<String, Track>,
    by_title: HashMap<String, Vec<String>>,
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a track into both indices. O(1) average.
    ///
    /// A duplicate id is an error and leaves the library untouched;
    /// silently overwriting would break the id bijection.
    pub fn insert(&mut self, track: Track) -> Result<()> {
        if self.by_id.contains_key(&track.id) {
            bail!("track id '{}' already exists", track.id);
        }
        self.by_title
            .entry(track.title.clone())
            .or_default()
            .push(track.id.clone());
        self.by_id.insert(track.id.clone(), track);
        Ok(())
    }

    /// Remove a track by id from both indices, returning the owned record.
    /// Unknown ids return `None`. O(1) average for the id map, O(k) for the
    /// title bucket (k = same-titled tracks); an emptied bucket is dropped.
    pub fn remove(&mut self, id: &str) -> Option<Track> {
        let track = self.by_id.remove(id)?;
        if let Some(bucket) = self.by_title.get_mut(&track.title) {
            bucket.retain(|entry| entry != id);
            if bucket.is_empty() {
                self.by_title.remove(&track.title);
            }
        }
        Some(track)
    }

    /// O(1)-average point lookup by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.by_id.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Track> {
        self.by_id.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ids of all tracks with exactly this title, in insertion order.
    /// Empty when the title is unknown.
    #[must_use]
    pub fn ids_by_title(&self, title: &str) -> &[String] {
        self.by_title.get(title).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.by_id.values()
    }
}
