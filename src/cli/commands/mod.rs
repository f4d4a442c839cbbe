//! Command implementations for the Cifsift CLI
//!
//! Each subcommand lives in its own module. Shared pieces here: the worker
//! selection flags and the run summary printer.

pub mod coordination;
pub mod info;
pub mod min_dist;

use anyhow::{Result, bail};
use clap::Args;

use crate::cli::Output;
use crate::config::WorkerPolicy;
use crate::filter::RunSummary;

/// Worker selection flags shared by the filter subcommands
#[derive(Args, Debug)]
pub struct WorkerArgs {
    /// Process files one at a time instead of in parallel
    #[arg(long, conflicts_with = "workers")]
    pub serial: bool,

    /// Number of worker threads (clamped to available cores minus two)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,
}

impl WorkerArgs {
    pub fn policy(&self) -> WorkerPolicy {
        if self.serial {
            WorkerPolicy::Serial
        } else {
            match self.workers {
                Some(n) => WorkerPolicy::Fixed(n),
                None => WorkerPolicy::MaxParallel,
            }
        }
    }
}

/// Print the end-of-run summary in the requested format.
pub fn print_summary(summary: &RunSummary, format: &str, output: &Output) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        "text" => {
            output.blank_line();
            output.success(&format!(
                "Filtered by {} in {:.2}s",
                summary.mode, summary.elapsed_secs
            ));
            output.summary_stats("Files found:", summary.total);
            output.summary_stats("Files processed:", summary.processed);
            output.summary_stats("Files moved:", summary.moved);
            if summary.errored > 0 {
                output.warning(&format!(
                    "{} file(s) could not be processed and were moved to the error folder",
                    summary.errored
                ));
            }
            if summary.moved > 0 {
                output.info(&format!("Destination: {}", summary.destination.display()));
            }
        }
        other => bail!("unknown output format: {other}"),
    }
    Ok(())
}
