//! Playlist sorting algorithms.
//!
//! Two algorithms over a snapshot of the playing sequence: a stable merge
//! sort (O(n log n), O(n) auxiliary) and an in-place quicksort with
//! last-element pivot (O(n log n) average, O(n²) on adversarial input such
//! as an already sorted run — a documented performance trade-off, not a
//! correctness one).
//!
//! The comparison is a total order: the criterion key first, then newer
//! `added_seq` first, then id. Distinct tracks never compare equal, so both
//! algorithms produce byte-identical orderings and either is a drop-in
//! substitute for the other.

use crate::track::Track;
use clap::ValueEnum;
use std::cmp::Ordering;

/// What to order the playlist by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortCriterion {
    /// Title A-Z.
    TitleAsc,
    /// Title Z-A.
    TitleDesc,
    /// Shortest first.
    DurationAsc,
    /// Longest first.
    DurationDesc,
    /// Newest first.
    RecentlyAdded,
}

/// Which algorithm performs the sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortAlgorithm {
    Merge,
    Quick,
}

/// Total-order comparison of two tracks under a criterion.
#[must_use]
pub fn cmp_tracks(a: &Track, b: &Track, criterion: SortCriterion) -> Ordering {
    let primary = match criterion {
        SortCriterion::TitleAsc => a.title.cmp(&b.title),
        SortCriterion::TitleDesc => b.title.cmp(&a.title),
        SortCriterion::DurationAsc => a.duration_secs.cmp(&b.duration_secs),
        SortCriterion::DurationDesc => b.duration_secs.cmp(&a.duration_secs),
        SortCriterion::RecentlyAdded => b.added_seq.cmp(&a.added_seq),
    };
    primary
        .then_with(|| b.added_seq.cmp(&a.added_seq))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort `tracks` in place with the chosen algorithm.
pub fn sort(tracks: &mut [&Track], criterion: SortCriterion, algorithm: SortAlgorithm) {
    match algorithm {
        SortAlgorithm::Merge => merge_sort(tracks, criterion),
        SortAlgorithm::Quick => quick_sort(tracks, criterion),
    }
}

/// Stable merge sort. Recursion depth O(log n), one O(n) scratch buffer per
/// merge level.
pub fn merge_sort(tracks: &mut [&Track], criterion: SortCriterion) {
    let n = tracks.len();
    if n <= 1 {
        return;
    }
    let mid = n / 2;
    merge_sort(&mut tracks[..mid], criterion);
    merge_sort(&mut tracks[mid..], criterion);
    merge(tracks, mid, criterion);
}

fn merge(tracks: &mut [&Track], mid: usize, criterion: SortCriterion) {
    let merged: Vec<_> = {
        let (left, right) = tracks.split_at(mid);
        let mut merged = Vec::with_capacity(tracks.len());
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            if cmp_tracks(left[i], right[j], criterion) != Ordering::Greater {
                merged.push(left[i]);
                i += 1;
            } else {
                merged.push(right[j]);
                j += 1;
            }
        }
        merged.extend_from_slice(&left[i..]);
        merged.extend_from_slice(&right[j..]);
        merged
    };
    tracks.copy_from_slice(&merged);
}

/// In-place quicksort, last element as pivot.
pub fn quick_sort(tracks: &mut [&Track], criterion: SortCriterion) {
    if tracks.len() <= 1 {
        return;
    }
    let pivot = partition(tracks, criterion);
    quick_sort(&mut tracks[..pivot], criterion);
    quick_sort(&mut tracks[pivot + 1..], criterion);
}

fn partition(tracks: &mut [&Track], criterion: SortCriterion) -> usize {
    let high = tracks.len() - 1;
    let mut store = 0;
    for j in 0..high {
        if cmp_tracks(tracks[j], tracks[high], criterion) == Ordering::Less {
            tracks.swap(store, j);
            store += 1;
        }
    }
    tracks.swap(store, high);
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str, duration: u32, seq: u64) -> Track {
        Track::new(id, title, "Artist", duration, 0, "Rock", seq)
    }

    fn fixtures() -> Vec<Track> {
        vec![
            track("003", "Charlie", 300, 3),
            track("001", "Alpha", 100, 1),
            track("004", "Delta", 400, 4),
            track("002", "Beta", 200, 2),
        ]
    }

    fn sorted_ids(
        tracks: &[Track],
        criterion: SortCriterion,
        algorithm: SortAlgorithm,
    ) -> Vec<String> {
        let mut refs: Vec<&Track> = tracks.iter().collect();
        sort(&mut refs, criterion, algorithm);
        refs.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn title_ascending_and_descending() {
        let tracks = fixtures();
        let asc = sorted_ids(&tracks, SortCriterion::TitleAsc, SortAlgorithm::Merge);
        assert_eq!(asc, ["001", "002", "003", "004"]);

        let desc = sorted_ids(&tracks, SortCriterion::TitleDesc, SortAlgorithm::Merge);
        assert_eq!(desc, ["004", "003", "002", "001"]);
    }

    #[test]
    fn duration_ordering() {
        let tracks = fixtures();
        let asc = sorted_ids(&tracks, SortCriterion::DurationAsc, SortAlgorithm::Quick);
        assert_eq!(asc, ["001", "002", "003", "004"]);

        let desc = sorted_ids(&tracks, SortCriterion::DurationDesc, SortAlgorithm::Quick);
        assert_eq!(desc, ["004", "003", "002", "001"]);
    }

    #[test]
    fn recently_added_is_newest_first() {
        let tracks = fixtures();
        let order = sorted_ids(&tracks, SortCriterion::RecentlyAdded, SortAlgorithm::Merge);
        assert_eq!(order, ["004", "003", "002", "001"]);
    }

    #[test]
    fn merge_and_quick_agree_with_duplicate_keys() {
        // Duplicate titles and durations force the tie-break path.
        let tracks = vec![
            track("a", "Same", 200, 1),
            track("b", "Same", 200, 2),
            track("c", "Other", 100, 3),
            track("d", "Same", 300, 4),
            track("e", "Other", 200, 5),
        ];

        for criterion in [
            SortCriterion::TitleAsc,
            SortCriterion::TitleDesc,
            SortCriterion::DurationAsc,
            SortCriterion::DurationDesc,
            SortCriterion::RecentlyAdded,
        ] {
            let merged = sorted_ids(&tracks, criterion, SortAlgorithm::Merge);
            let quicked = sorted_ids(&tracks, criterion, SortAlgorithm::Quick);
            assert_eq!(merged, quicked, "criterion {criterion:?} diverged");
        }
    }

    #[test]
    fn quick_sort_handles_presorted_input() {
        // Adversarial for the last-element pivot; still must be correct.
        let tracks: Vec<Track> = (0..50)
            .map(|i| track(&format!("{i:03}"), &format!("T{i:03}"), i, u64::from(i)))
            .collect();
        let order = sorted_ids(&tracks, SortCriterion::DurationAsc, SortAlgorithm::Quick);
        let expected: Vec<String> = (0..50).map(|i| format!("{i:03}")).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn empty_and_single_inputs() {
        let tracks = vec![track("a", "Only", 100, 1)];
        assert_eq!(
            sorted_ids(&tracks, SortCriterion::TitleAsc, SortAlgorithm::Merge),
            ["a"]
        );
        let empty: Vec<Track> = Vec::new();
        assert!(sorted_ids(&empty, SortCriterion::TitleAsc, SortAlgorithm::Quick).is_empty());
    }
}
