use anyhow::{Result, bail};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Per-file structural descriptor used as the basis for partitioning
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// Minimum pairwise atomic separation within the expanded structure, in angstroms
    MinDistance(f64),
    /// Unique coordination numbers across the structure's sites
    CoordinationNumbers(BTreeSet<u32>),
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::MinDistance(d) => write!(f, "{d:.3}"),
            Descriptor::CoordinationNumbers(set) => {
                let joined: Vec<String> = set.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", joined.join(" "))
            }
        }
    }
}

/// A descriptor successfully computed for one file. Never mutated after
/// creation; the file name is the only correlation key across the run.
#[derive(Debug, Clone)]
pub struct DescriptorResult {
    pub file_name: String,
    pub descriptor: Descriptor,
}

/// Computes a descriptor for a single file. Implemented by the CIF geometry
/// backend and by in-memory stubs in tests.
pub trait DescriptorSource: Sync {
    fn compute(&self, path: &Path) -> Result<Descriptor>;
}

/// Which files get selected for relocation.
///
/// Set comparisons are unordered and duplicate-insensitive (`BTreeSet`
/// semantics). Scalar bounds are exclusive: a value sitting exactly on `min`
/// or `max` stays put.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Select files whose scalar descriptor lies outside the open interval `(min, max)`
    OutsideRange { min: f64, max: f64 },
    /// Select files whose descriptor set equals the target set exactly
    ExactMatch(BTreeSet<u32>),
    /// Select files whose descriptor set shares at least one element with the target
    ContainsAny(BTreeSet<u32>),
}

impl Predicate {
    /// Reject meaningless predicates before any file is touched.
    pub fn validate(&self) -> Result<()> {
        match self {
            Predicate::OutsideRange { min, max } => {
                if !min.is_finite() || !max.is_finite() {
                    bail!("distance thresholds must be finite, got ({min}, {max})");
                }
                if min >= max {
                    bail!("minimum threshold {min} must be below maximum threshold {max}");
                }
                Ok(())
            }
            Predicate::ExactMatch(target) | Predicate::ContainsAny(target) => {
                if target.is_empty() {
                    bail!("coordination number list must not be empty");
                }
                Ok(())
            }
        }
    }

    /// Whether this descriptor is selected for relocation.
    pub fn selects(&self, descriptor: &Descriptor) -> bool {
        match (self, descriptor) {
            (Predicate::OutsideRange { min, max }, Descriptor::MinDistance(value)) => {
                !(*min < *value && *value < *max)
            }
            (Predicate::ExactMatch(target), Descriptor::CoordinationNumbers(set)) => set == target,
            (Predicate::ContainsAny(target), Descriptor::CoordinationNumbers(set)) => {
                !set.is_disjoint(target)
            }
            // Shape mismatch: the pipeline always pairs predicate and
            // descriptor kinds, so nothing is selected here
            _ => false,
        }
    }

    /// Destination folder name, derived only from the filter parameters so
    /// identical re-runs land in identical destinations.
    pub fn destination_name(&self) -> String {
        match self {
            Predicate::OutsideRange { min, max } => format!("dist_between_{min}_{max}"),
            Predicate::ExactMatch(target) => format!("CN_exact_{}", joined(target)),
            Predicate::ContainsAny(target) => format!("CN_contain_{}", joined(target)),
        }
    }

    /// Human-readable label for summaries and logs
    pub fn mode_label(&self) -> &'static str {
        match self {
            Predicate::OutsideRange { .. } => "minimum distance",
            Predicate::ExactMatch(_) => "coordination numbers (exact match)",
            Predicate::ContainsAny(_) => "coordination numbers (contains any)",
        }
    }

    /// File stem for the per-run CSV log
    pub fn csv_label(&self) -> &'static str {
        match self {
            Predicate::OutsideRange { .. } => "filter_min_dist_log",
            Predicate::ExactMatch(_) | Predicate::ContainsAny(_) => "filter_coordination_log",
        }
    }
}

fn joined(target: &BTreeSet<u32>) -> String {
    let parts: Vec<String> = target.iter().map(|n| n.to_string()).collect();
    parts.join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let predicate = Predicate::OutsideRange { min: 2.6, max: 12.0 };

        // Exactly on a bound is never selected
        assert!(!predicate.selects(&Descriptor::MinDistance(2.6)));
        assert!(!predicate.selects(&Descriptor::MinDistance(12.0)));

        // Strictly outside always is
        assert!(predicate.selects(&Descriptor::MinDistance(2.599)));
        assert!(predicate.selects(&Descriptor::MinDistance(12.001)));

        // Strictly inside never is
        assert!(!predicate.selects(&Descriptor::MinDistance(5.0)));
    }

    #[test]
    fn test_exact_match_is_order_and_duplicate_insensitive() {
        let predicate = Predicate::ExactMatch(set(&[16, 12]));
        assert!(predicate.selects(&Descriptor::CoordinationNumbers(set(&[12, 16]))));
        assert!(!predicate.selects(&Descriptor::CoordinationNumbers(set(&[12]))));
        assert!(!predicate.selects(&Descriptor::CoordinationNumbers(set(&[12, 16, 18]))));
    }

    #[test]
    fn test_contains_any_needs_one_shared_element() {
        let predicate = Predicate::ContainsAny(set(&[12, 16]));
        assert!(predicate.selects(&Descriptor::CoordinationNumbers(set(&[12]))));
        assert!(predicate.selects(&Descriptor::CoordinationNumbers(set(&[16, 18]))));
        assert!(!predicate.selects(&Descriptor::CoordinationNumbers(set(&[4, 6]))));
    }

    #[test]
    fn test_shape_mismatch_selects_nothing() {
        let predicate = Predicate::OutsideRange { min: 1.0, max: 2.0 };
        assert!(!predicate.selects(&Descriptor::CoordinationNumbers(set(&[12]))));
    }

    #[test]
    fn test_destination_names_are_deterministic() {
        let a = Predicate::OutsideRange { min: 2.6, max: 12.0 };
        let b = Predicate::OutsideRange { min: 2.6, max: 12.0 };
        assert_eq!(a.destination_name(), b.destination_name());
        assert_eq!(a.destination_name(), "dist_between_2.6_12");

        // Target values are embedded sorted regardless of input order
        assert_eq!(Predicate::ExactMatch(set(&[16, 12])).destination_name(), "CN_exact_12_16");
        assert_eq!(
            Predicate::ContainsAny(set(&[18, 12, 16])).destination_name(),
            "CN_contain_12_16_18"
        );
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        assert!(Predicate::OutsideRange { min: 2.6, max: 2.6 }.validate().is_err());
        assert!(Predicate::OutsideRange { min: 12.0, max: 2.6 }.validate().is_err());
        assert!(Predicate::OutsideRange { min: f64::NAN, max: 2.6 }.validate().is_err());
        assert!(Predicate::OutsideRange { min: 2.6, max: 12.0 }.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_target() {
        assert!(Predicate::ExactMatch(BTreeSet::new()).validate().is_err());
        assert!(Predicate::ContainsAny(BTreeSet::new()).validate().is_err());
        assert!(Predicate::ExactMatch(set(&[12])).validate().is_ok());
    }
}
