//! Generic parallel execution framework
//!
//! This module provides the worker-pool infrastructure used by the filter
//! pipeline to fan out per-file descriptor computations.
//!
//! # Architecture Responsibilities
//!
//! The parallel module focuses exclusively on **execution mechanics**:
//!
//! ## What This Module Does:
//! - **Work Distribution**: feeds pre-enumerated work items to N workers over
//!   bounded crossbeam channels
//! - **Failure Isolation**: one item's failure never aborts the pool or
//!   affects any other item; failures become typed reports, not panics
//! - **Drain Barrier**: `run` returns only after every item has reported,
//!   so callers can safely consume the aggregate afterwards
//! - **Progress Reporting**: throttled in-place progress lines
//!
//! ## What This Module Does NOT Do:
//! - **Resource Discovery**: the worker count arrives resolved from
//!   [`crate::config::WorkerPolicy`]; this module never reads host state
//! - **Domain Logic**: it does not know what a CIF or a descriptor is
//! - **Retry or Cancellation**: each item is dispatched exactly once
//!
//! # Example Usage
//!
//! ```rust
//! use cifsift::parallel::{WorkItem, WorkerPool};
//!
//! let items = WorkItem::from_paths(vec!["a.cif".into(), "b.cif".into()]);
//! let pool = WorkerPool::new(2);
//! let batch = pool.run(items, |item| Ok(item.file_name.len()), "Counting").unwrap();
//! assert_eq!(batch.completed.len(), 2);
//! ```

pub mod pool;

// Re-export main types for easier access
pub use pool::{BatchResults, CancelToken, FileFailure, WorkItem, WorkerPool};
