use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cif::{CifDescriptorSource, DescriptorKind};
use crate::cli::Output;
use crate::config::RunConfig;
use crate::filter::{Predicate, run_filter};
use crate::report::{FsRelocator, write_csv_log};

use super::{WorkerArgs, print_summary};

#[derive(Args, Debug)]
pub struct MinDistArgs {
    /// Directory of CIF files to filter
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Lower distance threshold in angstroms (exclusive)
    #[arg(long)]
    pub min: f64,

    /// Upper distance threshold in angstroms (exclusive)
    #[arg(long)]
    pub max: f64,

    #[command(flatten)]
    pub worker: WorkerArgs,

    /// Skip writing the CSV log
    #[arg(long)]
    pub no_csv: bool,
}

pub async fn execute(args: MinDistArgs, format: &str, output: &Output) -> Result<()> {
    let predicate = Predicate::OutsideRange { min: args.min, max: args.max };
    let config = RunConfig::new(args.worker.policy(), predicate)?;

    output.info(&format!(
        "Computing shortest distances for {} with {} worker(s)...",
        args.dir.display(),
        config.workers
    ));
    output.verbose(&format!(
        "files with shortest distance outside ({}, {}) will be moved",
        args.min, args.max
    ));

    let source = CifDescriptorSource::new(DescriptorKind::MinDistance);
    let summary = run_filter(&args.dir, &config, &source, &FsRelocator)?;

    if !args.no_csv && !summary.records.is_empty() {
        let path = write_csv_log(&args.dir, config.predicate.csv_label(), &summary.records)?;
        output.verbose(&format!("log written to {}", path.display()));
    }

    print_summary(&summary, format, output)
}
