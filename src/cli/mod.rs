//! Command-line interface of fructcheck.

pub mod commands;
pub mod interactive;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fructcheck - how much of this food fits under your fructose limit?
#[derive(Parser, Debug)]
#[command(name = "fructcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "fructcheck.toml", global = true)]
    pub config: PathBuf,

    /// Verbose output (debug logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Checks a food against the fructose limit.
    Search {
        /// Free-text food description, e.g. "1 cup of strawberries".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Prints the full result as JSON.
        #[arg(long)]
        json: bool,

        /// Does not store the API response in the cache.
        #[arg(long)]
        no_cache_write: bool,
    },

    /// Lists recent cached searches.
    History {
        /// Maximum number of searches to show.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Creates a configuration in the current directory.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Edits the configuration interactively.
    Config,

    /// Checks configuration, credentials and the cache database.
    Doctor,

    /// Starts the stdio tool server.
    Serve,

    /// Shows version information.
    Version,
}
