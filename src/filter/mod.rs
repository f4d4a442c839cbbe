//! Descriptor-based filtering of CIF file sets
//!
//! This is the heart of Cifsift: fan a per-file descriptor computation out
//! over the worker pool, aggregate the results behind the drain barrier,
//! partition the file set with a predicate, and hand the resulting groups to
//! the relocation sink. Descriptor computation itself lives behind the
//! [`DescriptorSource`] seam so the pipeline can be exercised without real
//! CIF geometry.

pub mod partition;
pub mod pipeline;
pub mod types;

pub use partition::{ERROR_GROUP, Grouping, partition};
pub use pipeline::{FileRecord, FileStatus, RunSummary, run_filter};
pub use types::{Descriptor, DescriptorResult, DescriptorSource, Predicate};
