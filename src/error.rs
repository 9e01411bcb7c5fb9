//! Error types for manifest reconciliation.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by tree scanning, hashing, reconciliation and persistence.
///
/// Every variant is fatal to a run: callers must not persist a partially
/// reconciled manifest after any of these.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No permission to access {}: {source}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is still locked after waiting {waited:?}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ManifestError {
    /// Classify an I/O failure on `path` into the permission or generic I/O variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => ManifestError::Permission { path, source },
            std::io::ErrorKind::NotFound => ManifestError::NotFound(path),
            _ => ManifestError::Io { path, source },
        }
    }
}

impl From<config::ConfigError> for ManifestError {
    fn from(err: config::ConfigError) -> Self {
        ManifestError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ManifestError {
    fn from(err: serde_json::Error) -> Self {
        ManifestError::Format(err.to_string())
    }
}
