//! Snapshot diffing.

use crate::snapshot::Snapshot;

/// Returns the full names present in `current` but absent from `previous`,
/// in `current`'s insertion order.
///
/// Pure function: no I/O, no side effects. A key present in both snapshots
/// never appears in the result, even when its record fields changed.
#[must_use]
pub fn new_full_names(previous: &Snapshot, current: &Snapshot) -> Vec<String> {
    current
        .iter()
        .filter(|record| !previous.contains(&record.full_name))
        .map(|record| record.full_name.clone())
        .collect()
}
