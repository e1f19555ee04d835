//! Loading the descriptor list from JSON.

use std::collections::HashSet;
use std::path::Path;

use super::{DescriptorError, ImageDescriptor};

/// Load and validate the descriptor list from a JSON file.
pub fn load_descriptors(path: &Path) -> Result<Vec<ImageDescriptor>, DescriptorError> {
    if !path.exists() {
        return Err(DescriptorError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|e| DescriptorError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_descriptors(&contents)
}

/// Parse and validate a JSON array of descriptors.
pub fn parse_descriptors(json: &str) -> Result<Vec<ImageDescriptor>, DescriptorError> {
    let descriptors: Vec<ImageDescriptor> = serde_json::from_str(json)?;

    for (index, descriptor) in descriptors.iter().enumerate() {
        descriptor
            .validate()
            .map_err(|reason| DescriptorError::Invalid { index, reason })?;
    }

    Ok(descriptors)
}

/// Filenames that appear more than once, in first-repeat order.
///
/// Later descriptors overwrite the output of earlier ones with the same name.
pub fn duplicate_filenames(descriptors: &[ImageDescriptor]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for descriptor in descriptors {
        if !seen.insert(descriptor.filename.as_str())
            && !duplicates.contains(&descriptor.filename)
        {
            duplicates.push(descriptor.filename.clone());
        }
    }

    duplicates
}
