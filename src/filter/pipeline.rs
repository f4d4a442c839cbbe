//! Filter run orchestration
//!
//! Wires the stages together: enumerate the directory, dispatch one work item
//! per file, drain the worker pool, derive the failure set, partition, and
//! hand each non-empty group to the relocation sink. Partitioning is
//! sequenced strictly after the pool barrier; no result is read while
//! workers are still running.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::parallel::{WorkItem, WorkerPool};
use crate::report::Relocator;

use super::partition::{ERROR_GROUP, Grouping, attach_error_group, partition};
use super::types::{DescriptorResult, DescriptorSource};

/// Where one input file ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Selected by the predicate and relocated
    Moved,
    /// Processed but not selected; stays in place
    Kept,
    /// Never produced a descriptor; relocated to the error group
    Error,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Moved => "moved",
            FileStatus::Kept => "kept",
            FileStatus::Error => "error",
        }
    }
}

/// Per-file row for the CSV log
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub file_name: String,
    /// Rendered descriptor, empty for failed files
    pub descriptor: String,
    pub status: FileStatus,
}

/// Outcome of one filter run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub mode: String,
    pub destination: PathBuf,
    pub total: usize,
    pub processed: usize,
    pub moved: usize,
    pub errored: usize,
    pub elapsed_secs: f64,
    pub grouping: Grouping,
    pub records: Vec<FileRecord>,
}

/// Enumerate `.cif` files directly under `dir`, sorted by file name so work
/// item indices are stable across runs.
pub fn collect_cif_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let is_cif = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("cif"))
            .unwrap_or(false);
        if path.is_file() && is_cif {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Run one complete filter pass over a directory.
pub fn run_filter(
    cif_dir: &Path,
    config: &RunConfig,
    source: &dyn DescriptorSource,
    relocator: &dyn Relocator,
) -> Result<RunSummary> {
    let started = Instant::now();
    let predicate = &config.predicate;
    let destination = cif_dir.join(predicate.destination_name());

    let paths = collect_cif_paths(cif_dir)?;
    let total = paths.len();

    // Degenerate run: no input means no pool and an empty grouping
    if total == 0 {
        return Ok(RunSummary {
            mode: predicate.mode_label().to_string(),
            destination,
            total: 0,
            processed: 0,
            moved: 0,
            errored: 0,
            elapsed_secs: started.elapsed().as_secs_f64(),
            grouping: Grouping::new(),
            records: Vec::new(),
        });
    }

    let items = WorkItem::from_paths(paths);
    let input_names: BTreeSet<String> =
        items.iter().map(|item| item.file_name.clone()).collect();

    debug!("dispatching {} files across {} workers", total, config.workers);
    let pool = WorkerPool::new(config.workers);
    let batch = pool.run(
        items,
        |item| source.compute(&item.path),
        predicate.mode_label(),
    )?;

    // The pool has drained; results are frozen from here on
    let results: Vec<DescriptorResult> = batch
        .completed
        .into_iter()
        .map(|(file_name, descriptor)| DescriptorResult { file_name, descriptor })
        .collect();

    // Failure set is derived from what never reported, then cross-checked
    // against the diagnostics the workers collected
    let completed_names: BTreeSet<String> =
        results.iter().map(|r| r.file_name.clone()).collect();
    let failure_set: BTreeSet<String> =
        input_names.difference(&completed_names).cloned().collect();
    if failure_set.len() != batch.failed.len() {
        warn!(
            "failure accounting mismatch: {} derived vs {} reported",
            failure_set.len(),
            batch.failed.len()
        );
    }

    let mut grouping = partition(&results, predicate);
    attach_error_group(&mut grouping, &failure_set);

    // Relocate every non-empty group; the sink never creates empty folders
    let mut moved = 0;
    for (group_name, members) in &grouping {
        let sources: Vec<PathBuf> = members.iter().map(|name| cif_dir.join(name)).collect();
        let count = relocator.move_files(&cif_dir.join(group_name), &sources)?;
        if group_name != ERROR_GROUP {
            moved += count;
        }
    }

    let records = build_records(&results, &grouping);

    Ok(RunSummary {
        mode: predicate.mode_label().to_string(),
        destination,
        total,
        processed: results.len(),
        moved,
        errored: failure_set.len(),
        elapsed_secs: started.elapsed().as_secs_f64(),
        grouping,
        records,
    })
}

/// One row per input file: moved, kept, or errored. Every input appears in
/// exactly one state.
fn build_records(results: &[DescriptorResult], grouping: &Grouping) -> Vec<FileRecord> {
    let mut selected = BTreeSet::new();
    for (group_name, members) in grouping {
        if group_name != ERROR_GROUP {
            selected.extend(members.iter().cloned());
        }
    }

    let mut records: Vec<FileRecord> = results
        .iter()
        .map(|r| FileRecord {
            file_name: r.file_name.clone(),
            descriptor: r.descriptor.to_string(),
            status: if selected.contains(&r.file_name) {
                FileStatus::Moved
            } else {
                FileStatus::Kept
            },
        })
        .collect();

    if let Some(failed) = grouping.get(ERROR_GROUP) {
        records.extend(failed.iter().map(|name| FileRecord {
            file_name: name.clone(),
            descriptor: String::new(),
            status: FileStatus::Error,
        }));
    }

    records.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    records
}
