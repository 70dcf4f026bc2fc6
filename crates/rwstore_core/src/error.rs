//! Error types for RWStore core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in RWStore core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Index backend error.
    #[error("storage error: {0}")]
    Storage(#[from] rwstore_storage::StorageError),

    /// Chunk codec error.
    #[error("codec error: {0}")]
    Codec(#[from] rwstore_codec::CodecError),

    /// The record declares a schema version this build cannot read.
    #[error("unknown rewriter config version: {version}")]
    UnsupportedSchemaVersion {
        /// The declared version.
        version: i64,
    },

    /// The record's version attribute is not an integer.
    #[error("invalid rewriter config version tag: {found}")]
    InvalidVersionTag {
        /// Description of the value that was found.
        found: String,
    },

    /// The stored config text could not be parsed.
    #[error("could not load 'config' of rewriter {rewriter_id}: {message}")]
    MalformedConfig {
        /// The rewriter whose config is broken.
        rewriter_id: String,
        /// Description of the parse failure.
        message: String,
    },

    /// A stored record has a field of the wrong shape.
    #[error("malformed record for rewriter {rewriter_id}: {message}")]
    MalformedRecord {
        /// The rewriter whose record is broken.
        rewriter_id: String,
        /// Description of the problem.
        message: String,
    },

    /// A put payload is not a valid rewriter definition.
    #[error("invalid rewriter request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The backend did not acknowledge a mapping update.
    #[error("mapping upgrade {upgrade} not acknowledged")]
    MappingNotAcknowledged {
        /// Name of the upgrade.
        upgrade: String,
    },
}

impl CoreError {
    /// Creates a malformed config error.
    pub fn malformed_config(rewriter_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedConfig {
            rewriter_id: rewriter_id.into(),
            message: message.into(),
        }
    }

    /// Creates a malformed record error.
    pub fn malformed_record(rewriter_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            rewriter_id: rewriter_id.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an invalid version tag error.
    pub fn invalid_version_tag(found: impl Into<String>) -> Self {
        Self::InvalidVersionTag {
            found: found.into(),
        }
    }
}
