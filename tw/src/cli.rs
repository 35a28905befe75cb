//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tripwise - step-by-step travel planner
#[derive(Parser)]
#[command(
    name = "tw",
    about = "Plan a trip step by step with suggestions from a language model",
    version,
    after_help = "Logs are written to: ~/.local/share/tripwise/logs/tripwise.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    /// Subcommand to execute; defaults to `plan`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the interactive planning wizard
    Plan,

    /// Send one prompt to the model and print the reply
    Ask {
        /// Prompt text
        prompt: String,

        /// Print the reply text as-is instead of parsed JSON
        #[arg(long)]
        raw: bool,
    },

    /// List prompt templates and where each one is loaded from
    Templates,

    /// Validate configuration and show the API key source
    Check,
}
