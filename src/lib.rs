//! # Cifsift - Parallel CIF Filtering for Crystallographers
//!
//! Cifsift batch-analyzes a directory of CIF files, computes a structural
//! descriptor for each one (shortest inter-atomic distance or the set of
//! coordination numbers), and relocates files into destination folders based
//! on a threshold or set-membership predicate.
//!
//! ## Features
//!
//! - **Parallel by default**: bounded worker pool sized from the host's cores
//! - **Failure isolation**: a malformed CIF never aborts the run; failed files
//!   are collected into their own destination folder
//! - **Deterministic**: destination names depend only on the filter
//!   parameters, never on worker count or completion order
//! - **CSV logging**: every run writes a per-file log next to the input data
//!
//! ## Quick Start
//!
//! ```bash
//! # Install cifsift
//! cargo install cifsift
//!
//! # Move files whose shortest distance falls outside (2.6, 12.0) angstroms
//! cifsift min-dist ./cifs --min 2.6 --max 12.0
//!
//! # Move files whose coordination numbers are exactly {12, 16}
//! cifsift coordination ./cifs --numbers 12,16 --mode exact
//! ```

pub mod cif;
pub mod cli;
pub mod config;
pub mod filter;
pub mod parallel;
pub mod report;

pub use cli::{Cli, Output};
pub use config::RunConfig;

/// Result type alias for Cifsift operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
