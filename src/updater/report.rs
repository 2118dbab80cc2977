//! Reload outcome types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::StoreError;

/// A failure confined to one source file.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path} to a JSON array: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("item {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("item {index} has no type")]
    MissingType { index: usize },

    #[error("item {index} has no mod")]
    MissingMod { index: usize },

    #[error("item {index} could not be stored: {source}")]
    Store {
        index: usize,
        #[source]
        source: StoreError,
    },
}

/// A failure that stops the reload.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("could not list source directory {path}: {source}")]
    SourceDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to a single source file.
#[derive(Debug, Default)]
pub struct FileOutcome {
    /// Documents inserted from this file.
    pub inserted: usize,
    pub errors: Vec<IngestError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of one reload run.
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// True only if every file parsed and every item converted.
    pub success: bool,
    /// Collections copied to the backup store.
    pub backed_up: Vec<String>,
    /// JSON files processed, keyed by path.
    pub files: BTreeMap<PathBuf, FileOutcome>,
    /// Non-JSON files that were ignored.
    pub skipped: Vec<PathBuf>,
}

impl UpdateReport {
    pub fn inserted(&self) -> usize {
        self.files.values().map(|f| f.inserted).sum()
    }

    pub fn failed_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(path, _)| path.as_path())
    }
}
