//! Shared error type for the file-backed persistence layer

use std::path::PathBuf;

use application::error::ApplicationError;
use thiserror::Error;

/// Errors raised while reading or writing the backup file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed backup file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode planner: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Encode(err) => Self::Internal(format!("Failed to encode planner: {err}")),
            other => Self::Storage(other.to_string()),
        }
    }
}
