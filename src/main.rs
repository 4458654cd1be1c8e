//! # Playdeck - In-Memory Playlist Engine
//!
//! Playdeck is a single-process playlist and catalogue engine that keeps
//! several purpose-built indices consistent over one set of tracks: a
//! doubly-linked playlist for ordering, hash maps for identity lookups, a
//! binary search tree for rating buckets, a bounded deque of recent skips
//! and a play-count driven calming replay selector.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `engine`: Orchestrator keeping every index consistent
//! - `playlist` / `history` / `rating` / `lookup`: core data structures
//! - `sorter`: merge and quick sort over playlist snapshots
//! - `skipped` / `replay`: recency tracking and calming auto-replay
//! - `shell`: interactive line-command front end
//!
//! ## Usage
//!
//! ```bash
//! # Scripted feature walkthrough
//! playdeck demo
//!
//! # Interactive shell
//! playdeck shell
//!
//! # Shell completions
//! playdeck completion zsh
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::info;
use playdeck::cli;
use playdeck::completion;
use playdeck::engine::{Engine, EngineConfig};
use playdeck::shell;
use playdeck::sorter::{SortAlgorithm, SortCriterion};

/// Main entry point for the Playdeck application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the appropriate module functions.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug playdeck demo` - Enable debug logging
/// - `RUST_LOG=playdeck::engine=trace playdeck shell` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Demo => {
            info!("Running scripted demo");
            run_demo()?;
        }
        cli::Command::Shell {
            skip_capacity,
            no_auto_replay,
        } => {
            let config = EngineConfig {
                skip_capacity,
                auto_replay: !no_auto_replay,
            };
            info!("Starting shell with {config:?}");
            let mut engine = Engine::with_config(&config);
            load_sample_catalogue(&mut engine)?;
            shell::run(&mut engine)?;
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}

/// Seed an engine with a small catalogue spanning the interesting cases:
/// mixed genres (including calming ones), mixed ratings and durations.
fn load_sample_catalogue(engine: &mut Engine) -> Result<()> {
    engine.add_track("001", "Bohemian Rhapsody", "Queen", 355, 5, "Rock")?;
    engine.add_track("002", "Imagine", "John Lennon", 183, 5, "Pop")?;
    engine.add_track("003", "Billie Jean", "Michael Jackson", 294, 4, "Pop")?;
    engine.add_track("004", "Clair de Lune", "Claude Debussy", 300, 5, "Classical")?;
    engine.add_track("005", "Weightless", "Marconi Union", 480, 4, "Ambient")?;
    engine.add_track("006", "So What", "Miles Davis", 545, 5, "Jazz")?;
    engine.add_track("007", "Smells Like Teen Spirit", "Nirvana", 301, 4, "Rock")?;
    engine.add_track("008", "Take Five", "Dave Brubeck", 324, 3, "Jazz")?;
    Ok(())
}

/// Walk through every engine feature with printed narration.
fn run_demo() -> Result<()> {
    let mut engine = Engine::new();
    load_sample_catalogue(&mut engine)?;
    println!("Loaded {} tracks.\n", engine.total_tracks());

    println!("-- Playback and history --");
    for id in ["001", "004", "006"] {
        if let Some(track) = engine.play(id) {
            println!("Playing: {track}");
        }
    }
    println!("Recently played:");
    for track in engine.recently_played(3) {
        println!("  {track}");
    }

    println!("\n-- Skip tracking --");
    engine.play("002");
    engine.skip();
    engine.play("003");
    engine.skip();
    println!("Recently skipped: {}", engine.recently_skipped().join(", "));
    if let Some(id) = engine.auto_play_next() {
        println!("Auto-play chose {id} (skip-aware).");
    }

    println!("\n-- Sorting --");
    engine.sort(SortCriterion::DurationDesc, SortAlgorithm::Quick);
    println!("By duration (quick sort):");
    for track in engine.playlist_tracks() {
        println!("  {track}");
    }
    engine.sort(SortCriterion::TitleAsc, SortAlgorithm::Merge);
    println!("By title (merge sort):");
    for track in engine.playlist_tracks() {
        println!("  {track}");
    }

    println!("\n-- Rating buckets --");
    engine.rate("008", 5);
    println!("Five-star tracks:");
    for track in engine.tracks_by_rating(5) {
        println!("  {track}");
    }

    println!("\n-- Undo --");
    if let Some(id) = engine.undo_last_play() {
        println!("Undo re-appended {id} to the playlist tail.");
    }

    println!("\n-- Calming auto-replay --");
    while engine.playlist_len() > 0 {
        engine.remove_at(0);
    }
    match engine.auto_play_next() {
        Some(id) => {
            let title = engine.track(&id).map(|t| t.title.clone()).unwrap_or_default();
            println!("Playlist empty; replaying calming pick: {title} ({id})");
        }
        None => println!("Playlist empty and nothing calming to replay."),
    }

    println!("\n-- Snapshot --");
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}
