//! Infrastructure error types

use std::io;

use jsonapi_domain::MarshalError;
use thiserror::Error;

/// Errors from the writer-facing marshal entry points.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The records could not be marshaled.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing to the output sink failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;
