//! # Slipbox CLI Module
//!
//! This module implements the CLI interface for slipbox.
//!
//! ## Available Commands
//!
//! - `status` - Show vault index status
//! - `links` - Show resolved outbound links of a note
//! - `backlinks` - Show inbound references to a note
//! - `dangling` - List links whose target does not exist
//! - `neighborhood` - Show notes within N hops of a note
//! - `tags` - List vault tags, or the notes carrying one tag
//! - `search` - Ranked lexical search over the vault
//! - `check` - Run the atomicity heuristics
//! - `export` - Export the index snapshot to a file
//! - `import` - Inspect a previously exported snapshot

mod commands;

use clap::{Parser, Subcommand};
use slipbox_core::SlipboxError;
use std::path::PathBuf;

pub use commands::*;

use crate::config::SlipboxConfig;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Slipbox - note-indexing and cross-reference engine
///
/// Indexes a directory of markdown notes into a bidirectional link graph
/// with ranked lexical search. Every command runs a fresh, deterministic
/// rebuild of the vault (except `import`, which reads a saved snapshot).
#[derive(Parser, Debug)]
#[command(name = "slipbox")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the config file (defaults to ./slipbox.toml when present)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the note vault (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub vault: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show vault index status
    Status,

    /// Show resolved outbound links of a note
    Links {
        /// Note id (file stem)
        id: String,
    },

    /// Show inbound references to a note
    Backlinks {
        /// Note id (file stem)
        id: String,
    },

    /// List links whose target does not exist in the vault
    Dangling,

    /// Show notes within N hops of a note (links and backlinks)
    Neighborhood {
        /// Note id (file stem)
        id: String,

        /// Maximum number of hops
        #[arg(short, long, default_value = "2")]
        depth: usize,
    },

    /// List vault tags, or the notes carrying one tag
    Tags {
        /// Show only notes carrying this tag
        tag: Option<String>,
    },

    /// Ranked lexical search over titles and bodies
    Search {
        /// Query text
        query: String,

        /// Maximum number of hits (overrides the config file)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run the atomicity heuristics over every note
    Check,

    /// Export the index snapshot to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Inspect a previously exported snapshot
    Import {
        /// Input file path
        #[arg(short, long)]
        file: PathBuf,
    },
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Execute the parsed CLI invocation.
pub fn execute(cli: Cli) -> Result<(), SlipboxError> {
    let mut config = SlipboxConfig::load(cli.config.as_deref())?;
    if let Some(vault) = cli.vault {
        config.vault = vault;
    }

    match cli.command {
        Commands::Status => cmd_status(&config, cli.json_mode),
        Commands::Links { id } => cmd_links(&config, &id, cli.json_mode),
        Commands::Backlinks { id } => cmd_backlinks(&config, &id, cli.json_mode),
        Commands::Dangling => cmd_dangling(&config, cli.json_mode),
        Commands::Neighborhood { id, depth } => {
            cmd_neighborhood(&config, &id, depth, cli.json_mode)
        }
        Commands::Tags { tag } => cmd_tags(&config, tag.as_deref(), cli.json_mode),
        Commands::Search { query, limit } => cmd_search(&config, &query, limit, cli.json_mode),
        Commands::Check => cmd_check(&config, cli.json_mode),
        Commands::Export { file } => cmd_export(&config, &file),
        Commands::Import { file } => cmd_import(&file, cli.json_mode),
    }
}
