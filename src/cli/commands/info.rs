use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

use crate::cif::CifSummary;
use crate::cli::Output;
use crate::filter::pipeline::collect_cif_paths;
use crate::report::write_csv;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Directory of CIF files to summarize
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Also compute the minimum distance per file (slow)
    #[arg(long)]
    pub compute_dist: bool,

    /// Skip writing the CSV log
    #[arg(long)]
    pub no_csv: bool,
}

/// Serial per-file overview of a CIF directory. A file that fails to parse
/// is reported and skipped; it never aborts the walk.
pub async fn execute(args: InfoArgs, output: &Output) -> Result<()> {
    let paths = collect_cif_paths(&args.dir)?;
    let total = paths.len();
    output.header(&format!("CIF directory info: {}", args.dir.display()));

    let overall = Instant::now();
    let mut rows = Vec::with_capacity(total);
    let mut errored = 0;

    for (i, path) in paths.iter().enumerate() {
        let started = Instant::now();
        match CifSummary::from_path(path, args.compute_dist) {
            Ok(summary) => {
                let elapsed = started.elapsed().as_secs_f64();
                output.info(&format!(
                    "[{}/{}] {} — {} ({} sites, {} supercell atoms) in {:.2}s",
                    i + 1,
                    total,
                    summary.file_name,
                    summary.formula,
                    summary.site_count,
                    summary.supercell_atom_count,
                    elapsed
                ));

                let min_dist = summary
                    .min_distance
                    .map(|d| format!("{d:.3}"))
                    .unwrap_or_default();
                rows.push(format!(
                    "{},\"{}\",{},{},{},{:.3}",
                    summary.file_name,
                    summary.formula.replace('"', "\"\""),
                    summary.site_count,
                    summary.supercell_atom_count,
                    min_dist,
                    elapsed
                ));
            }
            Err(e) => {
                errored += 1;
                output.error(&format!("failed to read {}: {e:#}", path.display()));
            }
        }
    }

    if !args.no_csv && !rows.is_empty() {
        let path = write_csv(
            &args.dir,
            "info",
            "file_name,formula,sites,supercell_atoms,min_distance,seconds",
            &rows,
        )?;
        output.verbose(&format!("log written to {}", path.display()));
    }

    output.blank_line();
    output.success(&format!(
        "Summarized {}/{} files in {:.2}s",
        total - errored,
        total,
        overall.elapsed().as_secs_f64()
    ));
    if errored > 0 {
        output.warning(&format!("{errored} file(s) could not be read"));
    }
    Ok(())
}
