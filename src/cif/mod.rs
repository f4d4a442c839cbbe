//! CIF-backed descriptor computation
//!
//! Implements the [`DescriptorSource`] seam over a minimal CIF parser and a
//! supercell geometry model. Each call parses one file from scratch; workers
//! share nothing beyond the (stateless) source itself.

pub mod geometry;
pub mod parser;

use anyhow::Result;
use std::path::Path;

use crate::filter::{Descriptor, DescriptorSource};

pub use geometry::Geometry;
pub use parser::{AtomSite, Cell, CifDocument};

/// Which descriptor a run computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorKind {
    MinDistance,
    CoordinationNumbers,
}

/// Stateless descriptor source reading real CIF files
pub struct CifDescriptorSource {
    kind: DescriptorKind,
}

impl CifDescriptorSource {
    pub fn new(kind: DescriptorKind) -> Self {
        Self { kind }
    }
}

impl DescriptorSource for CifDescriptorSource {
    fn compute(&self, path: &Path) -> Result<Descriptor> {
        let doc = CifDocument::parse_file(path)?;
        let geometry = Geometry::from_document(&doc)?;
        match self.kind {
            DescriptorKind::MinDistance => {
                Ok(Descriptor::MinDistance(geometry.shortest_distance()?))
            }
            DescriptorKind::CoordinationNumbers => {
                Ok(Descriptor::CoordinationNumbers(geometry.coordination_numbers()?))
            }
        }
    }
}

/// Per-file overview used by the `info` subcommand
#[derive(Debug)]
pub struct CifSummary {
    pub file_name: String,
    pub block_name: String,
    pub formula: String,
    pub site_count: usize,
    pub supercell_atom_count: usize,
    pub min_distance: Option<f64>,
}

impl CifSummary {
    /// Summarize one file, optionally computing the (slow) minimum distance.
    pub fn from_path(path: &Path, compute_distance: bool) -> Result<Self> {
        let doc = CifDocument::parse_file(path)?;
        let geometry = Geometry::from_document(&doc)?;
        let min_distance = if compute_distance {
            Some(geometry.shortest_distance()?)
        } else {
            None
        };

        Ok(Self {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            block_name: doc.name.clone(),
            formula: doc.formula.clone().unwrap_or_default(),
            site_count: doc.sites.len(),
            supercell_atom_count: geometry.supercell_atom_count(),
            min_distance,
        })
    }
}
