//! wal-archive-clean library exports

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod retention;

pub use config::{OutputFormat, RunConfig};
pub use error::{RetentionError, Result};
pub use retention::ArchiveRetentionManager;
