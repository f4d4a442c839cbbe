use anyhow::Result;
use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cif::{CifDescriptorSource, DescriptorKind};
use crate::cli::Output;
use crate::config::RunConfig;
use crate::filter::{Predicate, run_filter};
use crate::report::{FsRelocator, write_csv_log};

use super::{WorkerArgs, print_summary};

#[derive(Args, Debug)]
pub struct CoordinationArgs {
    /// Directory of CIF files to filter
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Coordination numbers to filter by, comma separated (e.g. 12,16)
    #[arg(long, value_delimiter = ',', required = true)]
    pub numbers: Vec<u32>,

    /// How descriptor sets are matched against the target numbers
    #[arg(long, value_enum, default_value = "exact")]
    pub mode: MatchMode,

    #[command(flatten)]
    pub worker: WorkerArgs,

    /// Skip writing the CSV log
    #[arg(long)]
    pub no_csv: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MatchMode {
    /// Coordination numbers must equal the target set exactly
    Exact,
    /// At least one coordination number must be in the target set
    Contain,
}

pub async fn execute(args: CoordinationArgs, format: &str, output: &Output) -> Result<()> {
    let target: BTreeSet<u32> = args.numbers.iter().copied().collect();
    let predicate = match args.mode {
        MatchMode::Exact => Predicate::ExactMatch(target),
        MatchMode::Contain => Predicate::ContainsAny(target),
    };
    let config = RunConfig::new(args.worker.policy(), predicate)?;

    output.info(&format!(
        "Computing coordination numbers for {} with {} worker(s)...",
        args.dir.display(),
        config.workers
    ));

    let source = CifDescriptorSource::new(DescriptorKind::CoordinationNumbers);
    let summary = run_filter(&args.dir, &config, &source, &FsRelocator)?;

    if !args.no_csv && !summary.records.is_empty() {
        let path = write_csv_log(&args.dir, config.predicate.csv_label(), &summary.records)?;
        output.verbose(&format!("log written to {}", path.display()));
    }

    print_summary(&summary, format, output)
}
