//! Error types for mirrorsync

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for mirrorsync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Filesystem operation failed on a known path
    #[error("Failed to {op} {path}: {source}")]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path handed to the mapper does not live under the expected root
    #[error("Path {path} is not under root {root}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The blocking task running a cycle panicked or was aborted
    #[error("Sync task failed: {0}")]
    Task(String),
}

impl SyncError {
    /// Wrap an io::Error with the operation and path that produced it
    pub fn fs(op: &'static str, path: &Path, source: io::Error) -> Self {
        SyncError::Fs {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Check if this error signals a broken internal invariant rather than a runtime failure
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SyncError::PathOutsideRoot { .. })
    }

    /// Check if retrying the cycle cannot fix this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::PathOutsideRoot { .. } | SyncError::Task(_))
    }

    /// Check if this error comes from configuration loading or validation
    pub fn is_config_error(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }

    /// The underlying io::ErrorKind, if this is an I/O failure
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            SyncError::Fs { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
