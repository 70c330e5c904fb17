//! # Slipbox - Note Indexing CLI
//!
//! The main binary for the slipbox note-indexing engine.
//!
//! This application provides a CLI over `slipbox-core`:
//! index a vault of markdown notes, query backlinks and dangling links,
//! run ranked lexical search, check note atomicity, and export/import
//! index snapshots.
//!
//! ## Usage
//!
//! ```bash
//! # Index the vault from slipbox.toml (or the current directory)
//! slipbox status
//!
//! # Graph queries
//! slipbox backlinks my-note
//! slipbox dangling
//!
//! # Search and hygiene
//! slipbox search "borrow checker"
//! slipbox check
//! ```

use clap::Parser;
use slipbox::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first so --verbose can widen the default filter
    let cli = cli::Cli::parse();

    // Initialize tracing. SLIPBOX_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SLIPBOX_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if cli.verbose {
        "slipbox=debug,slipbox_core=debug"
    } else {
        "slipbox=info,slipbox_core=info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("SLIPBOX_LOG")
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the slipbox startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██╗     ██╗██████╗ ██████╗  ██████╗ ██╗  ██╗
  ██╔════╝██║     ██║██╔══██╗██╔══██╗██╔═══██╗╚██╗██╔╝
  ███████╗██║     ██║██████╔╝██████╔╝██║   ██║ ╚███╔╝
  ╚════██║██║     ██║██╔═══╝ ██╔══██╗██║   ██║ ██╔██╗
  ███████║███████╗██║██║     ██████╔╝╚██████╔╝██╔╝ ██╗
  ╚══════╝╚══════╝╚═╝╚═╝     ╚═════╝  ╚═════╝ ╚═╝  ╚═╝

  Note Indexing Engine v{}

  Deterministic • Bidirectional • Atomic
"#,
        env!("CARGO_PKG_VERSION")
    );
}
