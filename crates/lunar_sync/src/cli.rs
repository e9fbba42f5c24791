//! Command-line interface for lunar_sync.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lunar Sync - terminal client for the lunar-phase board game
#[derive(Parser, Debug)]
#[command(name = "lunar_sync")]
#[command(about = "Sync and animate a lunar-phase game from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file (optional; defaults apply if missing)
    #[arg(short, long, default_value = "lunar_sync.toml", global = true)]
    pub config: PathBuf,

    /// Game server URL (overrides config and LUNAR_SERVER_URL)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Seat to play, 1 or 2 (overrides config and LUNAR_PLAYER)
    #[arg(short, long, global = true)]
    pub player: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Follow the game: poll for snapshots, animate scoring, read moves from stdin
    Watch {
        /// Jump scores straight to each snapshot
        #[arg(long)]
        no_animations: bool,
    },

    /// Print the current snapshot as JSON
    State,

    /// Place a card
    Place {
        /// Target node name
        node: String,

        /// Card value (0-7)
        value: u8,
    },

    /// Start a new game
    Reset,

    /// Take back the last move
    Undo,

    /// Replay an undone move
    Redo,
}
