//! Error types for the storage layer

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur against the persistence contract (spec.md §6)
#[derive(Error, Debug)]
pub enum StorageError {
    /// No record exists for the given id and kind
    #[error("record not found: kind={kind:?}, id={id}")]
    NotFound {
        /// Record kind
        kind: crate::ids::Kind,
        /// Record id
        id: u64,
    },

    /// Underlying I/O failure (file backend only)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },

    /// The store is exhausted (out of space, quota, or similar)
    #[error("storage exhausted: {reason}")]
    Exhausted {
        /// Reason for exhaustion
        reason: String,
    },

    /// A write was attempted against a corrupted or unreadable record
    #[error("corrupted record: kind={kind:?}, id={id}: {reason}")]
    Corrupted {
        /// Record kind
        kind: crate::ids::Kind,
        /// Record id
        id: u64,
        /// Reason
        reason: String,
    },
}

impl StorageError {
    /// Create an exhaustion error
    pub fn exhausted(reason: impl Into<String>) -> Self {
        Self::Exhausted {
            reason: reason.into(),
        }
    }
}
