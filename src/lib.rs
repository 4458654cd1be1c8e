//! In-memory playlist engine with multi-index lookups.
//!
//! Core modules:
//! - [`track`]: the track record shared by every index
//! - [`playlist`]: doubly-linked playing order with O(1) appends
//! - [`history`]: LIFO stack of played tracks for undo
//! - [`rating`]: binary search tree of rating buckets
//! - [`lookup`]: owning catalogue with id and title hash indices
//! - [`sorter`]: merge and quick sort over playlist snapshots
//! - [`skipped`]: bounded deque of recently skipped tracks
//! - [`replay`]: play-count statistics and calming auto-replay
//! - [`engine`]: orchestrator keeping all of the above consistent
//! - [`cli`] / [`shell`] / [`completion`]: command-line surfaces

pub mod cli;
pub mod completion;
pub mod engine;
pub mod history;
pub mod lookup;
pub mod playlist;
pub mod rating;
pub mod replay;
pub mod shell;
pub mod skipped;
pub mod sorter;
pub mod track;
