//! # Edifice - Architecture Model Workspace Tool
//!
//! The main binary for the Edifice model graph engine.
//!
//! This application provides:
//! - CLI interface for workspace operations
//! - Workspace database management (redb-backed)
//! - Conversion between the binary persisted form and JSON
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            apps/edifice (THE BINARY)         │
//! │                                              │
//! │  ┌─────────────┐      ┌───────────────────┐  │
//! │  │   CLI       │      │  Workspace files  │  │
//! │  │  (clap)     │      │  (JSON / binary)  │  │
//! │  └──────┬──────┘      └─────────┬─────────┘  │
//! │         │                       │            │
//! │         └───────────┬───────────┘            │
//! │                     ▼                        │
//! │            ┌─────────────────┐               │
//! │            │  edifice-core   │               │
//! │            │  (THE LOGIC)    │               │
//! │            └─────────────────┘               │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! edifice status
//! edifice derive
//! edifice export -o workspace.json -t json
//! edifice import -i workspace.json -t json
//! edifice init
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — EDIFICE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("EDIFICE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "edifice=debug"
    } else {
        "edifice=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
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
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Edifice startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██████╗ ██╗███████╗██╗ ██████╗███████╗
  ██╔════╝██╔══██╗██║██╔════╝██║██╔════╝██╔════╝
  █████╗  ██║  ██║██║█████╗  ██║██║     █████╗
  ██╔══╝  ██║  ██║██║██╔══╝  ██║██║     ██╔══╝
  ███████╗██████╔╝██║██║     ██║╚██████╗███████╗
  ╚══════╝╚═════╝ ╚═╝╚═╝     ╚═╝ ╚═════╝╚══════╝

  Architecture Model Workspace v{}

  Deterministic • Hierarchical • Derivable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
