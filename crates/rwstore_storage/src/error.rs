//! Error types for index backend operations.

use thiserror::Error;

/// Result type for index backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during index backend operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The index does not exist.
    #[error("index not found: {index}")]
    IndexNotFound {
        /// Name of the missing index.
        index: String,
    },

    /// The index already exists and cannot be created again.
    #[error("index already exists: {index}")]
    IndexAlreadyExists {
        /// Name of the existing index.
        index: String,
    },

    /// A keyword field value is longer than the field type allows.
    #[error("value of keyword field {field} is {bytes} bytes, limit is {max}")]
    FieldTooLarge {
        /// Dotted path of the offending field.
        field: String,
        /// UTF-8 length of the rejected value.
        bytes: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// A mapping document has the wrong structure.
    #[error("invalid mapping: {0}")]
    InvalidMapping(String),
}

impl StorageError {
    /// Returns true if this error reports a missing index.
    pub fn is_index_not_found(&self) -> bool {
        matches!(self, StorageError::IndexNotFound { .. })
    }
}
