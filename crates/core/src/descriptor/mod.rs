//! Image descriptors: the static `{filename, query}` list driving a run.

mod loader;
mod types;

pub use loader::{duplicate_filenames, load_descriptors, parse_descriptors};
pub use types::ImageDescriptor;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading descriptors.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Descriptor file not found.
    #[error("Descriptor file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Descriptor file could not be read.
    #[error("Failed to read descriptor file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor list is not valid JSON.
    #[error("Failed to parse descriptors: {0}")]
    Parse(#[from] serde_json::Error),

    /// A descriptor failed validation.
    #[error("Invalid descriptor at index {index}: {reason}")]
    Invalid { index: usize, reason: String },
}
