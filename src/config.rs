//! Run configuration passed through the pipeline

use crate::models::Mode;
use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

/// How the report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Header plus one entry name per line
    #[default]
    Plain,
    /// Full report as pretty JSON
    Json,
}

/// Immutable parameters of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// List or remove
    pub mode: Mode,
    /// Archive directory, or a segment/backup file inside it
    pub target: PathBuf,
    pub format: OutputFormat,
}

impl RunConfig {
    pub fn new(mode: Mode, target: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            target: target.into(),
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
