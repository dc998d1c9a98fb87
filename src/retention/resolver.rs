//! Reference resolution - picks the segment id used as the deletion cutoff

use super::read_entry_names;
use crate::error::{RetentionError, Result};
use crate::models::{ReferenceAnchor, ResolvedTarget, WalSegmentName};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const BACKUP_SUFFIX: &str = ".backup";

/// Resolve `target` into the archive directory and the reference segment.
///
/// A directory is anchored on its newest `.backup` label. A regular file is
/// anchored on its own name and resolves to its parent directory. Anything
/// else is reported as not found.
pub fn resolve(target: &Path) -> Result<ResolvedTarget> {
    let metadata =
        fs::metadata(target).map_err(|_| RetentionError::PathNotFound(target.to_path_buf()))?;

    if metadata.is_dir() {
        resolve_directory(target)
    } else if metadata.is_file() {
        resolve_file(target)
    } else {
        Err(RetentionError::PathNotFound(target.to_path_buf()))
    }
}

fn resolve_directory(directory: &Path) -> Result<ResolvedTarget> {
    let label = read_entry_names(directory)?
        .into_iter()
        .filter(|name| name.ends_with(BACKUP_SUFFIX))
        .max()
        .ok_or_else(|| RetentionError::NoBackupFound(directory.to_path_buf()))?;

    let reference = WalSegmentName::from_entry_name(&label);
    debug!(label = %label, reference = %reference, "Anchored on newest backup label");

    Ok(ResolvedTarget {
        directory: directory.to_path_buf(),
        reference,
        anchor: ReferenceAnchor::BackupLabel(label),
    })
}

fn resolve_file(file: &Path) -> Result<ResolvedTarget> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RetentionError::PathNotFound(file.to_path_buf()))?;

    let directory = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let reference = WalSegmentName::from_entry_name(name);
    debug!(file = %name, reference = %reference, "Anchored on explicit file");

    Ok(ResolvedTarget {
        directory,
        reference,
        anchor: ReferenceAnchor::ExplicitFile(name.to_string()),
    })
}
