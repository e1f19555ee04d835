//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing derivatives.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Original image not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Original could not be decoded.
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// A derivative could not be encoded.
    #[error("Failed to encode {format}: {reason}")]
    Encode { format: String, reason: String },

    /// I/O error while writing a derivative.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Background encoding task failed.
    #[error("Encoding task failed: {0}")]
    Task(String),
}

impl EncodeError {
    /// Creates a new encode error.
    pub fn encode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            reason: reason.into(),
        }
    }
}
