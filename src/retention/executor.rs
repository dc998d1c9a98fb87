//! Action execution - lists or removes the retention set

use crate::models::{DeletionFailure, FailureKind, Mode, RetentionSet};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Per-run result of acting on a retention set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub considered: usize,
    pub succeeded: Vec<String>,
    pub failures: Vec<DeletionFailure>,
}

/// Act on every stale entry in listing order.
///
/// `List` never touches the filesystem. `Remove` deletes `directory/entry` one
/// at a time; a failed entry is recorded and the batch moves on. There is no
/// retry and no rollback.
pub fn execute(mode: Mode, directory: &Path, stale: &RetentionSet) -> ActionOutcome {
    let mut outcome = ActionOutcome {
        considered: stale.len(),
        ..Default::default()
    };

    match mode {
        Mode::List => {
            outcome.succeeded = stale.iter().map(str::to_string).collect();
        }
        Mode::Remove => {
            for entry in stale.iter() {
                match remove_entry(directory, entry) {
                    Ok(()) => {
                        debug!(entry = %entry, "Removed archived entry");
                        outcome.succeeded.push(entry.to_string());
                    }
                    Err(failure) => {
                        warn!(
                            entry = %failure.entry,
                            kind = ?failure.kind,
                            reason = %failure.reason,
                            "Failed to remove archived entry"
                        );
                        outcome.failures.push(failure);
                    }
                }
            }
        }
    }

    outcome
}

fn remove_entry(directory: &Path, entry: &str) -> std::result::Result<(), DeletionFailure> {
    let path = directory.join(entry);
    fs::remove_file(&path).map_err(|e| DeletionFailure {
        entry: entry.to_string(),
        kind: FailureKind::classify(&e, &path),
        reason: e.to_string(),
    })
}
