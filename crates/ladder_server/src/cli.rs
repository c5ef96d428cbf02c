//! Command-line interface for the ladder server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe ladder - match server with a persistent leaderboard
#[derive(Parser, Debug)]
#[command(name = "ladder")]
#[command(about = "Tic-tac-toe match server with a leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (created if it doesn't exist)
        #[arg(long, env = "LADDER_DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Print the leaderboard as JSON
    Leaderboard {
        /// SQLite database file
        #[arg(long, env = "LADDER_DATABASE_URL", default_value = "ladder.db")]
        database_url: String,

        /// Number of entries to print
        #[arg(long, default_value = "10")]
        max: u32,
    },
}
