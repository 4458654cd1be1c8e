//! Interactive command shell.
//!
//! A line-oriented front end over [`Engine`]: each input line is split into
//! a command word plus arguments and dispatched. Unknown commands and bad
//! arguments print a message and keep the loop running; only `quit` (or
//! EOF) ends the session.

use crate::engine::Engine;
use crate::sorter::{SortAlgorithm, SortCriterion};
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;
use std::io::{self, BufRead, Write};

const PROMPT: &str = "playdeck> ";

/// Run the shell until `quit` or EOF on stdin.
pub fn run(engine: &mut Engine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("Playdeck interactive shell. Type 'help' for commands, 'quit' to exit.");

    loop {
        print!("{PROMPT}");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("shell command: {line}");
        if !dispatch(engine, line) {
            break;
        }
    }
    Ok(())
}

/// Execute one command line. Returns false when the shell should exit.
fn dispatch(engine: &mut Engine, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(word) => word,
        None => return true,
    };
    let args: Vec<&str> = parts.collect();

    let outcome = match command {
        "help" => {
            print_help();
            Ok(())
        }
        "quit" | "exit" => return false,
        "add" => cmd_add(engine, line),
        "list" => {
            print_playlist(engine);
            Ok(())
        }
        "play" => cmd_play(engine, &args),
        "skip" => {
            match engine.skip() {
                Some(id) => println!("Skipped {id}"),
                None => println!("Nothing is playing."),
            }
            Ok(())
        }
        "next" => {
            match engine.auto_play_next() {
                Some(id) => println!("Auto-playing {id}"),
                None => println!("Playback ended: playlist empty and no calming replays."),
            }
            Ok(())
        }
        "undo" => {
            match engine.undo_last_play() {
                Some(id) => println!("Re-added {id} to the playlist."),
                None => println!("History is empty."),
            }
            Ok(())
        }
        "rate" => cmd_rate(engine, &args),
        "move" => cmd_move(engine, &args),
        "remove" => cmd_remove(engine, &args),
        "delete" => cmd_delete(engine, &args),
        "reverse" => {
            engine.reverse();
            print_playlist(engine);
            Ok(())
        }
        "sort" => cmd_sort(engine, &args),
        "search" => cmd_search(engine, &args),
        "rating" => cmd_rating(engine, &args),
        "skipped" => {
            let ids = engine.recently_skipped();
            if ids.is_empty() {
                println!("No recently skipped tracks.");
            } else {
                println!("Recently skipped (newest first): {}", ids.join(", "));
            }
            Ok(())
        }
        "clear-skipped" => {
            engine.clear_skipped();
            println!("Skip tracker cleared.");
            Ok(())
        }
        "replay" => cmd_replay(engine, &args),
        "genres" => {
            let groups = engine.tracks_by_genre();
            let mut genres: Vec<&String> = groups.keys().collect();
            genres.sort();
            for genre in genres {
                println!("{genre}:");
                for track in &groups[genre] {
                    println!("  {track}");
                }
            }
            Ok(())
        }
        "top" => {
            for (id, count) in engine.top_played(5) {
                println!("{count:>5} plays  {id}");
            }
            Ok(())
        }
        "snapshot" => match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => {
                println!("{json}");
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        other => {
            println!("Unknown command '{other}'. Type 'help' for the command list.");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        println!("Error: {e:#}");
    }
    true
}

/// `add <id> <duration> <rating> <genre> <title> by <artist>`
///
/// Title and artist may contain spaces, so they come last and are split on
/// the literal word `by`.
fn cmd_add(engine: &mut Engine, line: &str) -> Result<()> {
    let rest = line.strip_prefix("add").unwrap_or(line).trim();
    let mut parts = rest.splitn(4, ' ');
    let id = parts.next().context("usage: add <id> <duration> <rating> <genre> <title> by <artist>")?;
    let duration: u32 = parts
        .next()
        .context("missing duration")?
        .parse()
        .context("duration must be a number of seconds")?;
    let rating: u8 = parts
        .next()
        .context("missing rating")?
        .parse()
        .context("rating must be 0-5")?;
    let tail = parts.next().context("missing genre and title")?;

    let (genre, name_part) = tail.split_once(' ').context("missing title")?;
    let (title, artist) = name_part
        .rsplit_once(" by ")
        .context("expected '<title> by <artist>'")?;

    let track = engine.add_track(id, title.trim(), artist.trim(), duration, rating, genre)?;
    println!("Added: {track}");
    Ok(())
}

fn cmd_play(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let id = args.first().context("usage: play <id>")?;
    match engine.play(id) {
        Some(track) => println!("Now playing: {track}"),
        None => println!("No track with id '{id}'."),
    }
    Ok(())
}

fn cmd_rate(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let id = args.first().context("usage: rate <id> <1-5>")?;
    let rating: u8 = args
        .get(1)
        .context("usage: rate <id> <1-5>")?
        .parse()
        .context("rating must be 1-5")?;
    if engine.rate(id, rating) {
        println!("Rated {id} at {rating} stars.");
    } else {
        println!("Could not rate '{id}' (unknown id or rating outside 1-5).");
    }
    Ok(())
}

fn cmd_move(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let from: usize = args.first().context("usage: move <from> <to>")?.parse()?;
    let to: usize = args.get(1).context("usage: move <from> <to>")?.parse()?;
    if engine.move_track(from, to) {
        print_playlist(engine);
    } else {
        println!("Invalid indices {from} -> {to}.");
    }
    Ok(())
}

fn cmd_remove(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let index: usize = args.first().context("usage: remove <index>")?.parse()?;
    if engine.remove_at(index) {
        println!("Removed playlist entry {index}.");
    } else {
        println!("No playlist entry at index {index}.");
    }
    Ok(())
}

fn cmd_delete(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let id = args.first().context("usage: delete <id>")?;
    if engine.remove_by_id(id) {
        println!("Deleted {id} from the catalogue and every index.");
    } else {
        println!("No track with id '{id}'.");
    }
    Ok(())
}

fn cmd_sort(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let criterion = args.first().context(
        "usage: sort <title-asc|title-desc|duration-asc|duration-desc|recently-added> [merge|quick]",
    )?;
    let criterion = SortCriterion::from_str(criterion, true)
        .map_err(|e| anyhow::anyhow!("unknown criterion: {e}"))?;
    let algorithm = match args.get(1) {
        Some(name) => SortAlgorithm::from_str(name, true)
            .map_err(|e| anyhow::anyhow!("unknown algorithm: {e}"))?,
        None => SortAlgorithm::Merge,
    };
    engine.sort(criterion, algorithm);
    print_playlist(engine);
    Ok(())
}

fn cmd_search(engine: &mut Engine, args: &[&str]) -> Result<()> {
    anyhow::ensure!(!args.is_empty(), "usage: search <title words...>");
    let title = args.join(" ");
    let matches = engine.tracks_by_title(&title);
    if matches.is_empty() {
        println!("No tracks titled '{title}'.");
    } else {
        for track in matches {
            println!("[{}] {track}", track.id);
        }
    }
    Ok(())
}

fn cmd_rating(engine: &mut Engine, args: &[&str]) -> Result<()> {
    let rating: u8 = args
        .first()
        .context("usage: rating <1-5>")?
        .parse()
        .context("rating must be 1-5")?;
    let tracks = engine.tracks_by_rating(rating);
    if tracks.is_empty() {
        println!("No tracks rated {rating}.");
    } else {
        for track in tracks {
            println!("[{}] {track}", track.id);
        }
    }
    Ok(())
}

fn cmd_replay(engine: &mut Engine, args: &[&str]) -> Result<()> {
    match args.first() {
        Some(&"on") => {
            engine.set_auto_replay(true);
            println!("Calming auto-replay enabled.");
        }
        Some(&"off") => {
            engine.set_auto_replay(false);
            println!("Calming auto-replay disabled.");
        }
        Some(other) => println!("usage: replay [on|off] (got '{other}')"),
        None => println!(
            "Calming auto-replay is {} ({} cycles so far).",
            if engine.auto_replay_enabled() { "on" } else { "off" },
            engine.replay_cycles()
        ),
    }
    Ok(())
}

fn print_playlist(engine: &Engine) {
    let tracks = engine.playlist_tracks();
    if tracks.is_empty() {
        println!("Playlist is empty.");
        return;
    }
    println!("Playlist ({} tracks):", tracks.len());
    for (index, track) in tracks.iter().enumerate() {
        println!("{index:>3}. [{}] {track}", track.id);
    }
}

fn print_help() {
    println!(
        "\
Commands:
  add <id> <duration> <rating> <genre> <title> by <artist>
  list                       show the playlist in playing order
  play <id>                  play a track
  skip                       skip the current track
  next                       auto-play the next unskipped track
  undo                       re-add the last played track to the playlist
  rate <id> <1-5>            set a track's rating
  move <from> <to>           reposition a playlist entry
  remove <index>             remove a playlist entry (track stays catalogued)
  delete <id>                remove a track from everything
  reverse                    reverse the playing order
  sort <criterion> [algo]    sort playlist (merge or quick)
  search <title>             find tracks by exact title
  rating <1-5>               list tracks in a rating bucket
  genres                     list tracks grouped by genre
  skipped                    show recently skipped ids
  clear-skipped              forget all recent skips
  replay [on|off]            show or toggle calming auto-replay
  top                        most played tracks
  snapshot                   dashboard snapshot as JSON
  quit                       exit the shell"
    );
}
