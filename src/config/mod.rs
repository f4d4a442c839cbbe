//! Run configuration for Cifsift
//!
//! Everything a filter run needs is resolved here, exactly once, before any
//! file is touched: the worker count (from the chosen policy and the host's
//! core count) and the filter predicate (validated up front). Downstream code
//! receives plain values and never reads ambient host state itself.

use anyhow::{Result, bail};

use crate::filter::Predicate;

/// How many workers a run gets.
///
/// `MaxParallel` keeps two cores in reserve so the host stays responsive while
/// a large batch is crunching; an explicit count is clamped to that ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPolicy {
    /// Exactly one worker, items processed in dispatch order
    Serial,
    /// `available cores - 2` workers (never below 1)
    MaxParallel,
    /// User-specified count, clamped to the max-parallel ceiling
    Fixed(usize),
}

impl WorkerPolicy {
    /// Resolve the policy against a core count into a concrete worker count.
    pub fn resolve(&self, available_cores: usize) -> usize {
        let ceiling = available_cores.saturating_sub(2).max(1);
        match self {
            WorkerPolicy::Serial => 1,
            WorkerPolicy::MaxParallel => ceiling,
            WorkerPolicy::Fixed(n) => (*n).clamp(1, ceiling),
        }
    }
}

/// Validated configuration for one filter run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Concrete worker count, resolved once at run start
    pub workers: usize,
    /// The filter predicate, validated at construction
    pub predicate: Predicate,
}

impl RunConfig {
    /// Build a run configuration, failing fast on an invalid predicate or
    /// worker policy. The core count is read here and nowhere else.
    pub fn new(policy: WorkerPolicy, predicate: Predicate) -> Result<Self> {
        if let WorkerPolicy::Fixed(0) = policy {
            bail!("worker count must be at least 1");
        }
        predicate.validate()?;
        let workers = policy.resolve(num_cpus::get());
        Ok(Self { workers, predicate })
    }

    /// Like `new`, but with the core count supplied by the caller.
    pub fn with_cores(policy: WorkerPolicy, predicate: Predicate, cores: usize) -> Result<Self> {
        if let WorkerPolicy::Fixed(0) = policy {
            bail!("worker count must be at least 1");
        }
        predicate.validate()?;
        let workers = policy.resolve(cores);
        Ok(Self { workers, predicate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_serial_policy_is_one_worker() {
        assert_eq!(WorkerPolicy::Serial.resolve(16), 1);
        assert_eq!(WorkerPolicy::Serial.resolve(1), 1);
    }

    #[test]
    fn test_max_parallel_reserves_headroom() {
        assert_eq!(WorkerPolicy::MaxParallel.resolve(16), 14);
        assert_eq!(WorkerPolicy::MaxParallel.resolve(4), 2);
        // Never drops below one worker on small hosts
        assert_eq!(WorkerPolicy::MaxParallel.resolve(2), 1);
        assert_eq!(WorkerPolicy::MaxParallel.resolve(1), 1);
    }

    #[test]
    fn test_fixed_policy_clamped_to_ceiling() {
        assert_eq!(WorkerPolicy::Fixed(4).resolve(16), 4);
        assert_eq!(WorkerPolicy::Fixed(64).resolve(16), 14);
        assert_eq!(WorkerPolicy::Fixed(3).resolve(2), 1);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let predicate = Predicate::OutsideRange { min: 2.6, max: 12.0 };
        let result = RunConfig::with_cores(WorkerPolicy::Fixed(0), predicate, 8);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_threshold_rejected_at_config_time() {
        let predicate = Predicate::OutsideRange { min: 12.0, max: 2.6 };
        let result = RunConfig::with_cores(WorkerPolicy::MaxParallel, predicate, 8);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_target_set_rejected_at_config_time() {
        let predicate = Predicate::ExactMatch(BTreeSet::new());
        let result = RunConfig::with_cores(WorkerPolicy::Serial, predicate, 8);
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_config_resolves_workers() {
        let mut numbers = BTreeSet::new();
        numbers.insert(12);
        let config =
            RunConfig::with_cores(WorkerPolicy::Fixed(4), Predicate::ContainsAny(numbers), 16)
                .unwrap();
        assert_eq!(config.workers, 4);
    }
}
