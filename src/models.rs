//! Core domain models for WAL archive retention

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fixed-width WAL segment identifier.
///
/// Segment names are zero-padded hex (timeline, log, segment), so byte-wise
/// string order is chronological order. The value is never decoded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WalSegmentName(String);

impl WalSegmentName {
    /// Number of leading characters of an entry name that form the segment id.
    pub const WIDTH: usize = 24;

    /// Take the segment id from an archive entry name.
    ///
    /// Names shorter than [`Self::WIDTH`] are taken whole.
    pub fn from_entry_name(name: &str) -> Self {
        let end = name
            .char_indices()
            .nth(Self::WIDTH)
            .map(|(idx, _)| idx)
            .unwrap_or(name.len());
        Self(name[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `entry_name` sorts strictly before this segment.
    #[inline]
    pub fn is_after(&self, entry_name: &str) -> bool {
        entry_name < self.0.as_str()
    }
}

impl fmt::Display for WalSegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with the stale entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Report only, no filesystem changes
    List,
    /// Delete every stale entry
    Remove,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::List => f.write_str("list"),
            Mode::Remove => f.write_str("remove"),
        }
    }
}

/// Where the reference point came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ReferenceAnchor {
    /// Newest `.backup` label found in the archive directory
    BackupLabel(String),
    /// File named explicitly on the command line
    ExplicitFile(String),
}

impl fmt::Display for ReferenceAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceAnchor::BackupLabel(name) => write!(f, "backup label {}", name),
            ReferenceAnchor::ExplicitFile(name) => write!(f, "file {}", name),
        }
    }
}

/// Output of reference resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Archive directory to list
    pub directory: PathBuf,
    /// Exclusive upper bound for deletion
    pub reference: WalSegmentName,
    pub anchor: ReferenceAnchor,
}

/// Entries that sort strictly before the reference point, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RetentionSet {
    entries: Vec<String>,
}

impl RetentionSet {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e == name)
    }
}

/// Why a single entry could not be deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Entry vanished between listing and removal
    NotFound,
    PermissionDenied,
    /// Entry is a directory
    IsDirectory,
    Other,
}

impl FailureKind {
    /// Classify a removal error for the entry at `path`.
    pub fn classify(err: &io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FailureKind::NotFound,
            _ if path.is_dir() => FailureKind::IsDirectory,
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            _ => FailureKind::Other,
        }
    }
}

/// A per-entry removal failure. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub entry: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RetentionReport {
    /// Correlates log lines of one run
    pub run_id: Uuid,
    pub mode: Mode,
    pub directory: PathBuf,
    pub reference: WalSegmentName,
    pub anchor: ReferenceAnchor,
    /// Number of stale entries found
    pub considered: usize,
    /// Entries listed (list mode) or removed (remove mode)
    pub succeeded: Vec<String>,
    pub failures: Vec<DeletionFailure>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl RetentionReport {
    #[inline]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    #[inline]
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// True when no entry failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
