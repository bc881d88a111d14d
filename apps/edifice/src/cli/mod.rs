//! # Edifice CLI Module
//!
//! This module implements the CLI interface for Edifice.
//!
//! ## Available Commands
//!
//! - `status` - Show workspace statistics
//! - `derive` - Run implicit-relationship derivation
//! - `export` - Export workspace to a file (JSON or binary)
//! - `import` - Import a workspace file into the database
//! - `init` - Initialize a new workspace database

mod commands;

use clap::{Parser, Subcommand};
use edifice_core::ModelError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Edifice - Architecture Model Workspace Tool
///
/// A deterministic engine for software-architecture model graphs:
/// people, systems, containers, components, deployments, and the
/// relationships between them.
#[derive(Parser, Debug)]
#[command(name = "edifice")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the workspace database
    #[arg(short = 'D', long, global = true, default_value = "edifice.db")]
    pub database: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show workspace statistics
    Status,

    /// Run implicit-relationship derivation and persist the result
    Derive,

    /// Export the workspace to a file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (binary, json)
        #[arg(short = 't', long, default_value = "binary")]
        format: String,
    },

    /// Import a workspace file into the database
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Input format (binary, json)
        #[arg(short = 't', long, default_value = "binary")]
        format: String,
    },

    /// Initialize a new empty workspace database
    Init {
        /// Force initialization even if the database exists
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ModelError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Status) => cmd_status(&cli.database, json_mode),
        Some(Commands::Derive) => cmd_derive(&cli.database, json_mode),
        Some(Commands::Export { output, format }) => {
            cmd_export(&cli.database, &output, &format)
        }
        Some(Commands::Import { input, format }) => cmd_import(&cli.database, &input, &format),
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, json_mode)
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_arguments() {
        let cli = Cli::parse_from(["edifice"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.database, PathBuf::from("edifice.db"));
        assert!(!cli.json_mode);
        assert!(!cli.quiet);
    }

    #[test]
    fn export_arguments_parse() {
        let cli = Cli::parse_from(["edifice", "export", "-o", "out.json", "-t", "json"]);
        match cli.command {
            Some(Commands::Export { output, format }) => {
                assert_eq!(output, PathBuf::from("out.json"));
                assert_eq!(format, "json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn export_format_defaults_to_binary() {
        let cli = Cli::parse_from(["edifice", "export", "-o", "out.bin"]);
        match cli.command {
            Some(Commands::Export { format, .. }) => assert_eq!(format, "binary"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::parse_from(["edifice", "status", "--json-mode", "-D", "other.db"]);
        assert!(cli.json_mode);
        assert_eq!(cli.database, PathBuf::from("other.db"));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }
}
