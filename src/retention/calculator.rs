//! Retention set calculation - which archive entries sort before the reference

use super::read_entry_names;
use crate::error::Result;
use crate::models::{RetentionSet, WalSegmentName};
use std::path::Path;
use tracing::debug;

/// List `directory` (non-recursive) and select every entry strictly older than
/// `reference`. Subdirectories are not filtered out.
pub fn compute_stale(directory: &Path, reference: &WalSegmentName) -> Result<RetentionSet> {
    let names = read_entry_names(directory)?;
    let listed = names.len();
    let stale = select_stale(names, reference);

    debug!(
        listed = listed,
        stale = stale.len(),
        reference = %reference,
        "Computed retention set"
    );
    Ok(stale)
}

/// Keep the names that sort strictly before `reference`, preserving order.
pub fn select_stale<I>(names: I, reference: &WalSegmentName) -> RetentionSet
where
    I: IntoIterator<Item = String>,
{
    RetentionSet::new(
        names
            .into_iter()
            .filter(|name| reference.is_after(name))
            .collect(),
    )
}
