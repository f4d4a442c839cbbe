//! Pure partitioning of aggregated results into destination groups

use std::collections::{BTreeMap, BTreeSet};

use super::types::{DescriptorResult, Predicate};

/// Destination group holding files that never produced a descriptor.
/// Present in every filter mode whenever at least one file failed.
pub const ERROR_GROUP: &str = "cifs_encountered_error";

/// Mapping from destination folder name to the set of selected file names.
/// Produced once per run, after the pool barrier, and consumed once by the
/// relocation sink.
pub type Grouping = BTreeMap<String, BTreeSet<String>>;

/// Partition aggregated results under a predicate.
///
/// Pure: the grouping depends only on the inputs, never on completion order
/// or worker count. The predicate's destination group is always present,
/// possibly empty; each result lands in it at most once.
pub fn partition(results: &[DescriptorResult], predicate: &Predicate) -> Grouping {
    let mut selected = BTreeSet::new();
    for result in results {
        if predicate.selects(&result.descriptor) {
            selected.insert(result.file_name.clone());
        }
    }

    let mut grouping = Grouping::new();
    grouping.insert(predicate.destination_name(), selected);
    grouping
}

/// Attach the error group for files that never reported a descriptor.
/// A no-op when every file completed.
pub fn attach_error_group(grouping: &mut Grouping, failed: &BTreeSet<String>) {
    if !failed.is_empty() {
        grouping.insert(ERROR_GROUP.to_string(), failed.clone());
    }
}
