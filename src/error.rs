//! Error types for the key/value store
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the store and its snapshot codec.
///
/// Missing keys and missing snapshot files are not errors: they are
/// reported through `Option` and `LoadOutcome::NotFound` respectively.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Snapshot file could not be read or written
    #[error("Snapshot I/O failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file exists but its content is malformed
    #[error("Malformed snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// In-memory state could not be encoded
    #[error("Snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// A blocking snapshot job was cancelled or panicked
    #[error("Snapshot task failed: {0}")]
    TaskFailed(String),
}

impl StoreError {
    /// Wraps an I/O error with the snapshot path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mentions_path() {
        let err = StoreError::io(
            "/tmp/snap.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/snap.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_parse_error_is_distinct() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = StoreError::Parse {
            path: PathBuf::from("snap.json"),
            source,
        };
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().starts_with("Malformed snapshot"));
    }
}
