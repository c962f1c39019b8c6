//! CLI command definitions and dispatch for the `pchat` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI is read-only
//! administration: inspect the persona catalog and saved conversations;
//! chatting happens over the REST API.

pub mod persona;
pub mod record;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Persona chat backend for the Gemini API.
#[derive(Parser)]
#[command(name = "pchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
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
    /// List the configured personas.
    Personas,

    /// Browse saved conversations.
    Records {
        #[command(subcommand)]
        action: RecordCommand,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RecordCommand {
    /// List saved conversations, newest first.
    #[command(alias = "ls")]
    List,

    /// Show a saved conversation transcript.
    Show {
        /// Record ID to display.
        id: String,
    },
}
