//! Batch run types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::descriptor::ImageDescriptor;
use crate::provider::Attribution;

/// Where a descriptor's original came from in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionSource {
    /// Curated photo search API.
    Curated,
    /// Keyword-based random photo service.
    Keyword,
    /// Generic placeholder after all retries failed.
    Placeholder,
    /// Original already on disk; nothing downloaded.
    CacheHit,
}

/// Outcome of obtaining a descriptor's original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionResult {
    pub descriptor: ImageDescriptor,
    pub original_path: PathBuf,
    pub source: AcquisitionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
}

/// Sidecar attribution record, written as `<filename>-meta.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionRecord {
    pub source: String,
    pub photographer: String,
    pub id: u64,
    pub query: String,
}

impl AttributionRecord {
    /// Record for a curated-provider attribution.
    pub fn curated(attribution: &Attribution) -> Self {
        Self {
            source: "pexels".to_string(),
            photographer: attribution.photographer.clone(),
            id: attribution.provider_id,
            query: attribution.query.clone(),
        }
    }
}

/// Flags for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Produce derivatives for every descriptor with an original.
    pub optimize: bool,
    /// Re-download originals even when they already exist.
    pub force: bool,
}

/// Per-descriptor outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorReport {
    pub filename: String,
    /// `None` when every provider and the placeholder failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition: Option<AcquisitionResult>,
    #[serde(default)]
    pub derivatives: Vec<PathBuf>,
    /// Error that aborted this descriptor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DescriptorReport {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            acquisition: None,
            derivatives: Vec::new(),
            error: None,
        }
    }

    /// An original is available and nothing failed.
    pub fn is_success(&self) -> bool {
        self.acquisition.is_some() && self.error.is_none()
    }

    pub fn source(&self) -> Option<AcquisitionSource> {
        self.acquisition.as_ref().map(|a| a.source)
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub descriptors: Vec<DescriptorReport>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.descriptors.len()
    }

    pub fn failed(&self) -> usize {
        self.descriptors.iter().filter(|d| !d.is_success()).count()
    }

    pub fn downloaded(&self) -> usize {
        self.descriptors
            .iter()
            .filter(|d| {
                d.source()
                    .is_some_and(|s| s != AcquisitionSource::CacheHit)
            })
            .count()
    }

    /// Report for a filename; the last one wins for duplicates.
    pub fn get(&self, filename: &str) -> Option<&DescriptorReport> {
        self.descriptors.iter().rev().find(|d| d.filename == filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acquired(filename: &str, source: AcquisitionSource) -> DescriptorReport {
        DescriptorReport {
            filename: filename.to_string(),
            acquisition: Some(AcquisitionResult {
                descriptor: ImageDescriptor::new(filename, "query"),
                original_path: PathBuf::from(format!("/out/{}-orig.jpg", filename)),
                source,
                attribution: None,
            }),
            derivatives: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn test_attribution_record_json() {
        let record = AttributionRecord::curated(&Attribution {
            photographer: "Ella Olsson".to_string(),
            provider_id: 1640777,
            query: "pasta".to_string(),
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "source": "pexels",
                "photographer": "Ella Olsson",
                "id": 1640777,
                "query": "pasta"
            })
        );
    }

    #[test]
    fn test_batch_report_counters() {
        let mut failed = DescriptorReport::new("broken");
        failed.error = Some("decode failed".to_string());

        let report = BatchReport {
            descriptors: vec![
                acquired("hero", AcquisitionSource::Keyword),
                acquired("about", AcquisitionSource::CacheHit),
                DescriptorReport::new("missing"),
                failed,
            ],
        };

        assert_eq!(report.processed(), 4);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.downloaded(), 1);
        assert_eq!(
            report.get("about").and_then(|d| d.source()),
            Some(AcquisitionSource::CacheHit)
        );
        assert!(report.get("nope").is_none());
    }
}
