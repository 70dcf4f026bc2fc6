//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while chunking, joining or (de)serializing configs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A caller-supplied parameter can never produce a valid result.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the parameter problem.
        message: String,
    },

    /// A stored value is neither a string nor an array of strings.
    #[error("unexpected config value shape: {found}")]
    UnexpectedValueShape {
        /// Name of the shape that was found.
        found: String,
    },

    /// Failed to serialize a config object to text.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to parse config text back into a config object.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an unexpected value shape error.
    pub fn unexpected_shape(found: impl Into<String>) -> Self {
        Self::UnexpectedValueShape {
            found: found.into(),
        }
    }

    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}
