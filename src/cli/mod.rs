//! Command line interface for popcache.

pub mod commands;
pub mod trace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::config::CONFIG_FILE;

/// popcache - replay operation traces against a bounded LRU cache.
#[derive(Parser, Debug)]
#[command(name = "popcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode.
    #[arg(short, long)]
    pub quiet: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Writes a default configuration file.
    Init {
        /// Target directory (default: current directory).
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Prints the resolved configuration.
    Config,

    /// Replays a trace of set/get/del operations against a fresh cache.
    Replay {
        /// Trace file.
        file: PathBuf,

        /// Cache capacity (default: from configuration).
        #[arg(long)]
        capacity: Option<usize>,

        /// Print a JSON report instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Shows version.
    Version,
}
