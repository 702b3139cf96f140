//! Watermark persistence errors.

use std::path::PathBuf;
use thiserror::Error;

/// The watermark could not be made durable.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem failure while writing or replacing the watermark file.
    #[error("Failed to persist watermark to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store path has no parent directory or file name.
    #[error("Invalid watermark path: {0}")]
    InvalidPath(PathBuf),

    /// Failure reported by a non-file store.
    #[error("Watermark store unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias using PersistenceError.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
