//! CLI command definitions and dispatch for the `docent` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod index;
pub mod search;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ask questions about your document corpus.
#[derive(Parser)]
#[command(name = "docent", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (defaults to ./docent.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer questions about the corpus (interactive unless a question
    /// is given).
    Ask {
        /// A single question to answer non-interactively.
        question: Option<String>,
    },

    /// Rebuild the vector index from the configured corpus source.
    Index,

    /// Show what retrieval returns for a query, without generating an
    /// answer.
    Search {
        /// The query to retrieve for.
        query: String,

        /// Number of chunks to show.
        #[arg(short = 'k', long, default_value = "4")]
        top_k: usize,
    },

    /// Show configuration and index status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
