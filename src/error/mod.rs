//! Error handling module for clipsift

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for clipsift operations
#[derive(Error, Debug)]
pub enum ClipsiftError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Domain-level failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for clipsift operations
pub type ClipsiftResult<T> = std::result::Result<T, ClipsiftError>;
