//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Playdeck using Clap
//! derive macros. It provides a type-safe way to parse command-line arguments
//! and route them to appropriate functionality.
//!
//! ## Commands
//!
//! - `demo`: Load a sample catalogue and walk through the engine features
//! - `shell`: Start the interactive command shell
//! - `completion`: Generate shell completion scripts
//!
//! ## Examples
//!
//! ```bash
//! playdeck demo
//! playdeck shell
//! playdeck completion bash > ~/.local/share/bash-completion/completions/playdeck
//! ```

use clap::{Parser, Subcommand, ValueEnum};

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. The main structure contains only a subcommand
/// since all functionality is accessed through specific commands.
#[derive(Parser)]
#[command(name = "playdeck")]
#[command(about = "Playdeck - In-memory playlist engine with multi-index lookups")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
///
/// Each variant corresponds to a major piece of functionality in Playdeck.
/// Command arguments are embedded directly in the enum variants for
/// type safety and automatic validation.
#[derive(Subcommand)]
pub enum Command {
    /// Run a scripted demonstration of the engine
    ///
    /// Loads a small sample catalogue and exercises every feature in turn:
    /// playback with history, skip tracking, playlist sorting with both
    /// algorithms, rating buckets, undo, and the end-of-playlist calming
    /// auto-replay. Useful as a smoke test and as living documentation.
    Demo,

    /// Start the interactive command shell
    ///
    /// Opens a line-oriented shell on stdin where tracks can be added,
    /// played, skipped, rated, sorted and removed interactively. Type
    /// `help` inside the shell for the command list, `quit` to leave.
    Shell {
        /// Capacity of the recently-skipped tracker
        ///
        /// How many skipped tracks auto-play steers around before they
        /// age out of the buffer.
        #[arg(long, default_value_t = crate::skipped::DEFAULT_CAPACITY)]
        skip_capacity: usize,

        /// Disable calming auto-replay when the playlist runs out
        #[arg(long)]
        no_auto_replay: bool,
    },

    /// Generate shell completions
    ///
    /// Generates completion scripts for various shells to enable tab
    /// completion of commands and subcommands.
    ///
    /// Usage: playdeck completion bash > ~/.local/share/bash-completion/completions/playdeck
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
