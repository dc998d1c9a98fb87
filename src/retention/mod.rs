//! Archive retention pipeline: resolve the reference, compute the stale set,
//! then list or remove it.

pub mod calculator;
pub mod executor;
pub mod resolver;

use crate::config::RunConfig;
use crate::error::{RetentionError, Result};
use crate::models::RetentionReport;
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Runs one list/remove pass over an archive directory.
pub struct ArchiveRetentionManager {
    config: RunConfig,
}

impl ArchiveRetentionManager {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline.
    ///
    /// Resolution and listing errors are returned before anything is deleted.
    /// Per-entry removal failures are carried in the report instead.
    pub fn run(&self) -> Result<RetentionReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mode = self.config.mode;

        let target = resolver::resolve(&self.config.target)?;
        info!(
            run_id = %run_id,
            mode = %mode,
            directory = %target.directory.display(),
            reference = %target.reference,
            anchor = %target.anchor,
            "Resolved reference point"
        );

        let stale = calculator::compute_stale(&target.directory, &target.reference)?;
        let outcome = executor::execute(mode, &target.directory, &stale);

        if outcome.failures.is_empty() {
            info!(
                run_id = %run_id,
                considered = outcome.considered,
                succeeded = outcome.succeeded.len(),
                "Retention run finished"
            );
        } else {
            warn!(
                run_id = %run_id,
                considered = outcome.considered,
                succeeded = outcome.succeeded.len(),
                failed = outcome.failures.len(),
                "Retention run finished with failures"
            );
        }

        Ok(RetentionReport {
            run_id,
            mode,
            directory: target.directory,
            reference: target.reference,
            anchor: target.anchor,
            considered: outcome.considered,
            succeeded: outcome.succeeded,
            failures: outcome.failures,
            started_at,
            completed_at: Utc::now(),
        })
    }
}

/// Names of the entries directly inside `directory`, in listing order.
///
/// Names that are not valid UTF-8 cannot be WAL segments and are skipped.
pub(crate) fn read_entry_names(directory: &Path) -> Result<Vec<String>> {
    let list_err = |source| RetentionError::ListDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(directory).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                warn!(entry = ?raw, "Skipping entry with non UTF-8 name");
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mode, ReferenceAnchor};
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_read_entry_names_is_not_recursive() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("000000010000000000000001")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub").join("000000010000000000000000")).unwrap();

        let mut names = read_entry_names(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["000000010000000000000001", "sub"]);
    }

    #[test]
    fn test_read_entry_names_missing_directory() {
        let dir = tempdir().unwrap();
        let err = read_entry_names(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, RetentionError::ListDirectory { .. }));
    }

    #[test]
    fn test_run_reports_anchor() {
        let dir = tempdir().unwrap();
        let label = "000000010000000000000002.00000060.backup";
        File::create(dir.path().join("000000010000000000000001")).unwrap();
        File::create(dir.path().join(label)).unwrap();

        let report = ArchiveRetentionManager::new(RunConfig::new(Mode::List, dir.path()))
            .run()
            .unwrap();

        assert_eq!(report.anchor, ReferenceAnchor::BackupLabel(label.to_string()));
        assert_eq!(report.succeeded, vec!["000000010000000000000001".to_string()]);
    }

    #[test]
    fn test_run_fails_before_listing_on_missing_target() {
        let dir = tempdir().unwrap();
        let manager =
            ArchiveRetentionManager::new(RunConfig::new(Mode::Remove, dir.path().join("missing")));

        assert!(matches!(
            manager.run().unwrap_err(),
            RetentionError::PathNotFound(_)
        ));
    }
}
