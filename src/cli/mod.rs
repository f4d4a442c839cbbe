//! Command-line interface for Cifsift
//!
//! This module provides the main CLI structure and command handling.
//! It uses clap for argument parsing and dispatches each subcommand to its
//! own module under `commands/`.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

pub mod commands;
mod output;

pub use output::Output;

use commands::coordination::CoordinationArgs;
use commands::info::InfoArgs;
use commands::min_dist::MinDistArgs;

/// Cifsift - Parallel CIF filtering by structural descriptors
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for run summaries (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Move files whose shortest atomic distance falls outside a range
    MinDist(MinDistArgs),
    /// Move files by their coordination numbers
    Coordination(CoordinationArgs),
    /// Summarize every CIF file in a directory
    Info(InfoArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Some(Commands::MinDist(args)) => {
                commands::min_dist::execute(args, &self.format, &output).await
            }
            Some(Commands::Coordination(args)) => {
                commands::coordination::execute(args, &self.format, &output).await
            }
            Some(Commands::Info(args)) => commands::info::execute(args, &output).await,
            None => {
                // Show help when no command is provided
                let mut cmd = Cli::command();
                cmd.print_help()?;
                Ok(())
            }
        }
    }
}
