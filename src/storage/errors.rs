//! # Record Store Errors

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record carries the requested primary key
    #[error("Record not found: {key}")]
    NotFound { key: String },

    /// The table file is not well-formed CSV
    #[error("Malformed table {}: {reason}", path.display())]
    MalformedTable { path: PathBuf, reason: String },

    /// Read, write, or rename failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The exclusive table lock was not acquired in time
    #[error("Timed out after {waited:?} waiting for lock on {}", path.display())]
    LockTimeout { path: PathBuf, waited: Duration },

    /// Explicit primary key collides with an existing record (strict key policy only)
    #[error("Duplicate primary key: {key}")]
    DuplicateKey { key: String },
}

impl StoreError {
    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        StoreError::NotFound { key: key.into() }
    }

    /// Convert a csv error raised while reading `path`.
    ///
    /// I/O failures surfaced through the csv reader stay I/O errors; everything
    /// else means the file content itself is bad.
    pub(crate) fn from_csv(path: &std::path::Path, err: csv::Error) -> Self {
        if err.is_io_error() {
            return match err.into_kind() {
                csv::ErrorKind::Io(e) => StoreError::Io(e),
                other => StoreError::MalformedTable {
                    path: path.to_path_buf(),
                    reason: format!("{:?}", other),
                },
            };
        }
        StoreError::MalformedTable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::DuplicateKey { .. } => 409,
            StoreError::LockTimeout { .. } => 503,
            StoreError::MalformedTable { .. } => 500,
            StoreError::Io(_) => 500,
        }
    }

    /// Whether a caller may reasonably retry the same operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::LockTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::not_found("7").status_code(), 404);
        assert_eq!(
            StoreError::DuplicateKey { key: "1".into() }.status_code(),
            409
        );
        assert_eq!(
            StoreError::LockTimeout {
                path: PathBuf::from("users.csv"),
                waited: Duration::from_secs(5),
            }
            .status_code(),
            503
        );
        assert_eq!(
            StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk")).status_code(),
            500
        );
    }

    #[test]
    fn test_only_lock_timeout_is_retryable() {
        assert!(StoreError::LockTimeout {
            path: PathBuf::from("t.csv"),
            waited: Duration::from_millis(10),
        }
        .is_retryable());
        assert!(!StoreError::not_found("1").is_retryable());
    }

    #[test]
    fn test_display_mentions_path() {
        let err = StoreError::MalformedTable {
            path: PathBuf::from("data/users.csv"),
            reason: "found record with 3 fields, but the previous record has 2 fields".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("data/users.csv"));
        assert!(msg.contains("3 fields"));
    }
}
