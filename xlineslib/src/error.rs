//! Error types for xlineslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during line counting
#[derive(Error, Debug)]
pub enum XlinesError {
    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Worker cap outside the valid range; rejected before any worker starts
    #[error("worker cap must be at least 1 (got {0})")]
    InvalidWorkerCount(usize),

    /// Failed to write the debug result artifact
    #[error("failed to write result artifact '{path}': {source}")]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize results
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
