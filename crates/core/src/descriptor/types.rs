//! Descriptor types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A logical named image request.
///
/// `filename` is the output base name and the descriptor's identity in logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Output base name, without extension.
    pub filename: String,
    /// Search term handed to the providers.
    pub query: String,
}

impl ImageDescriptor {
    /// Create a new descriptor.
    pub fn new(filename: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            query: query.into(),
        }
    }

    /// Path of the downloaded original: `<dir>/<filename>-orig.jpg`.
    pub fn original_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-orig.jpg", self.filename))
    }

    /// Path of the attribution record: `<dir>/<filename>-meta.json`.
    pub fn meta_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}-meta.json", self.filename))
    }

    /// Check that the filename is usable as an output base name.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.filename.trim().is_empty() {
            return Err("filename is empty".to_string());
        }
        if self.query.trim().is_empty() {
            return Err(format!("query for '{}' is empty", self.filename));
        }
        if self.filename.contains(['/', '\\']) || self.filename.contains("..") {
            return Err(format!(
                "filename '{}' must be a plain base name",
                self.filename
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_paths() {
        let descriptor = ImageDescriptor::new("hero", "pasta");
        let dir = Path::new("/site/images");
        assert_eq!(
            descriptor.original_path(dir),
            PathBuf::from("/site/images/hero-orig.jpg")
        );
        assert_eq!(
            descriptor.meta_path(dir),
            PathBuf::from("/site/images/hero-meta.json")
        );
    }

    #[test]
    fn test_validate() {
        assert!(ImageDescriptor::new("hero", "pasta").validate().is_ok());
        assert!(ImageDescriptor::new("", "pasta").validate().is_err());
        assert!(ImageDescriptor::new("hero", "  ").validate().is_err());
        assert!(ImageDescriptor::new("../hero", "pasta").validate().is_err());
        assert!(ImageDescriptor::new("menu/hero", "pasta").validate().is_err());
    }
}
