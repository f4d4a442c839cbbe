//! Relocation and reporting sinks
//!
//! The pipeline hands finished groupings to these; nothing here inspects
//! descriptors or filesystem state beyond the paths it is given.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::filter::FileRecord;

/// Moves selected files into a destination folder.
pub trait Relocator {
    /// Move `sources` into `destination`, returning how many files moved.
    /// An empty source set is a no-op and must not create the destination.
    fn move_files(&self, destination: &Path, sources: &[PathBuf]) -> Result<usize>;
}

/// Filesystem-backed relocator
pub struct FsRelocator;

impl Relocator for FsRelocator {
    fn move_files(&self, destination: &Path, sources: &[PathBuf]) -> Result<usize> {
        if sources.is_empty() {
            return Ok(0);
        }

        std::fs::create_dir_all(destination)
            .with_context(|| format!("failed to create {}", destination.display()))?;

        let mut moved = 0;
        for source in sources {
            let file_name = source
                .file_name()
                .with_context(|| format!("source has no file name: {}", source.display()))?;
            let target = destination.join(file_name);

            // A leftover from an earlier run is replaced, not appended to
            if target.exists() {
                std::fs::remove_file(&target)
                    .with_context(|| format!("failed to replace {}", target.display()))?;
            }

            std::fs::rename(source, &target)
                .with_context(|| format!("failed to move {}", source.display()))?;
            debug!("moved {} -> {}", source.display(), target.display());
            moved += 1;
        }
        Ok(moved)
    }
}

/// Write pre-rendered CSV lines to `<dir>/csv/<label>.csv`, overwriting any
/// previous log with the same label.
pub fn write_csv(dir: &Path, label: &str, header: &str, rows: &[String]) -> Result<PathBuf> {
    let csv_dir = dir.join("csv");
    std::fs::create_dir_all(&csv_dir)
        .with_context(|| format!("failed to create {}", csv_dir.display()))?;

    let path = csv_dir.join(format!("{label}.csv"));
    let mut out = std::fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writeln!(out, "{header}")?;
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(path)
}

/// Write the per-file filter run log.
pub fn write_csv_log(dir: &Path, label: &str, records: &[FileRecord]) -> Result<PathBuf> {
    let rows: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "{},\"{}\",{}",
                record.file_name,
                record.descriptor.replace('"', "\"\""),
                record.status.as_str()
            )
        })
        .collect();
    write_csv(dir, label, "file_name,descriptor,status", &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FileStatus;

    #[test]
    fn test_empty_move_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("dest");

        let moved = FsRelocator.move_files(&destination, &[]).unwrap();
        assert_eq!(moved, 0);
        assert!(!destination.exists());
    }

    #[test]
    fn test_move_creates_destination_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.cif");
        std::fs::write(&source, "new contents").unwrap();

        let destination = dir.path().join("dest");
        std::fs::create_dir_all(&destination).unwrap();
        std::fs::write(destination.join("a.cif"), "stale contents").unwrap();

        let moved = FsRelocator.move_files(&destination, &[source.clone()]).unwrap();
        assert_eq!(moved, 1);
        assert!(!source.exists());
        assert_eq!(
            std::fs::read_to_string(destination.join("a.cif")).unwrap(),
            "new contents"
        );
    }

    #[test]
    fn test_csv_log_format() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            FileRecord {
                file_name: "a.cif".to_string(),
                descriptor: "2.584".to_string(),
                status: FileStatus::Moved,
            },
            FileRecord {
                file_name: "b.cif".to_string(),
                descriptor: String::new(),
                status: FileStatus::Error,
            },
        ];

        let path = write_csv_log(dir.path(), "filter_min_dist_log", &records).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "file_name,descriptor,status");
        assert_eq!(lines[1], "a.cif,\"2.584\",moved");
        assert_eq!(lines[2], "b.cif,\"\",error");
    }
}
