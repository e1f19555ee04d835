use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

use crate::batch::AcquisitionSource;

/// Pipeline event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    // Run lifecycle
    BatchStarted {
        descriptors: usize,
        optimize: bool,
        force: bool,
    },
    DuplicateFilename {
        filename: String,
    },
    BatchCompleted {
        processed: usize,
        failed: usize,
    },

    // Acquisition
    SkippedExisting {
        filename: String,
        path: String,
    },
    Preparing {
        filename: String,
        query: String,
    },
    DownloadingCurated {
        filename: String,
        url: String,
    },
    CuratedFailed {
        filename: String,
        reason: String,
    },
    AttemptFailed {
        filename: String,
        url: String,
        /// 1-indexed attempt number.
        attempt: u32,
        error: String,
        retry_in_ms: u64,
    },
    PlaceholderFallback {
        filename: String,
        url: String,
    },
    PlaceholderFailed {
        filename: String,
        error: String,
    },
    Saved {
        filename: String,
        path: String,
        source: AcquisitionSource,
    },
    AcquisitionFailed {
        filename: String,
    },
    AttributionFailed {
        filename: String,
        error: String,
    },

    // Derivatives
    Optimizing {
        filename: String,
    },
    Optimized {
        filename: String,
        derivatives: usize,
    },
    OptimizeSkipped {
        filename: String,
        reason: String,
    },

    DescriptorFailed {
        filename: String,
        error: String,
    },
}

impl PipelineEvent {
    /// Returns the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => "batch_started",
            Self::DuplicateFilename { .. } => "duplicate_filename",
            Self::BatchCompleted { .. } => "batch_completed",
            Self::SkippedExisting { .. } => "skipped_existing",
            Self::Preparing { .. } => "preparing",
            Self::DownloadingCurated { .. } => "downloading_curated",
            Self::CuratedFailed { .. } => "curated_failed",
            Self::AttemptFailed { .. } => "attempt_failed",
            Self::PlaceholderFallback { .. } => "placeholder_fallback",
            Self::PlaceholderFailed { .. } => "placeholder_failed",
            Self::Saved { .. } => "saved",
            Self::AcquisitionFailed { .. } => "acquisition_failed",
            Self::AttributionFailed { .. } => "attribution_failed",
            Self::Optimizing { .. } => "optimizing",
            Self::Optimized { .. } => "optimized",
            Self::OptimizeSkipped { .. } => "optimize_skipped",
            Self::DescriptorFailed { .. } => "descriptor_failed",
        }
    }

    /// Severity the event is logged at
    pub fn level(&self) -> Level {
        match self {
            Self::DescriptorFailed { .. } | Self::PlaceholderFailed { .. } => Level::ERROR,
            Self::DuplicateFilename { .. }
            | Self::CuratedFailed { .. }
            | Self::AttemptFailed { .. }
            | Self::PlaceholderFallback { .. }
            | Self::AcquisitionFailed { .. }
            | Self::AttributionFailed { .. }
            | Self::OptimizeSkipped { .. } => Level::WARN,
            _ => Level::INFO,
        }
    }

    /// Descriptor the event belongs to, if any
    pub fn descriptor(&self) -> Option<&str> {
        match self {
            Self::BatchStarted { .. } | Self::BatchCompleted { .. } => None,
            Self::DuplicateFilename { filename }
            | Self::SkippedExisting { filename, .. }
            | Self::Preparing { filename, .. }
            | Self::DownloadingCurated { filename, .. }
            | Self::CuratedFailed { filename, .. }
            | Self::AttemptFailed { filename, .. }
            | Self::PlaceholderFallback { filename, .. }
            | Self::PlaceholderFailed { filename, .. }
            | Self::Saved { filename, .. }
            | Self::AcquisitionFailed { filename }
            | Self::AttributionFailed { filename, .. }
            | Self::Optimizing { filename }
            | Self::Optimized { filename, .. }
            | Self::OptimizeSkipped { filename, .. }
            | Self::DescriptorFailed { filename, .. } => Some(filename.as_str()),
        }
    }
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchStarted {
                descriptors,
                optimize,
                force,
            } => write!(
                f,
                "Processing {} descriptors (optimize={}, force={})",
                descriptors, optimize, force
            ),
            Self::DuplicateFilename { filename } => write!(
                f,
                "Filename '{}' appears more than once; later entries overwrite earlier ones",
                filename
            ),
            Self::BatchCompleted { processed, failed } => {
                write!(f, "Done. {} processed, {} failed", processed, failed)
            }
            Self::SkippedExisting { path, .. } => write!(f, "Skipped (exists): {}", path),
            Self::Preparing { filename, query } => {
                write!(f, "Preparing to download {} -> {}", query, filename)
            }
            Self::DownloadingCurated { url, .. } => write!(f, "Downloading from Pexels: {}", url),
            Self::CuratedFailed { filename, reason } => {
                write!(f, "Pexels fetch failed for {}: {}", filename, reason)
            }
            Self::AttemptFailed {
                url,
                attempt,
                error,
                retry_in_ms,
                ..
            } => write!(
                f,
                "Attempt {} failed for {}: {}. Retrying in {}ms...",
                attempt, url, error, retry_in_ms
            ),
            Self::PlaceholderFallback { filename, url } => write!(
                f,
                "All retries failed for {}. Using fallback: {}",
                filename, url
            ),
            Self::PlaceholderFailed { filename, error } => {
                write!(f, "Fallback also failed for {}: {}", filename, error)
            }
            Self::Saved { path, source, .. } => match source {
                AcquisitionSource::Curated => write!(f, "Saved: {} (Pexels)", path),
                AcquisitionSource::Placeholder => write!(f, "Saved: {} (placeholder)", path),
                _ => write!(f, "Saved: {}", path),
            },
            Self::AcquisitionFailed { filename } => write!(
                f,
                "Failed to obtain image for {}; leaving existing original if present",
                filename
            ),
            Self::AttributionFailed { filename, error } => {
                write!(f, "Could not write attribution for {}: {}", filename, error)
            }
            Self::Optimizing { filename } => write!(f, "Optimizing {}", filename),
            Self::Optimized {
                filename,
                derivatives,
            } => write!(f, "Wrote {} derivatives for {}", derivatives, filename),
            Self::OptimizeSkipped { filename, reason } => {
                write!(f, "Skipping optimization for {}: {}", filename, reason)
            }
            Self::DescriptorFailed { filename, error } => {
                write!(f, "Error fetching {}: {}", filename, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = PipelineEvent::AttemptFailed {
            filename: "hero".to_string(),
            url: "https://example.com/a.jpg".to_string(),
            attempt: 2,
            error: "HTTP 503".to_string(),
            retry_in_ms: 1000,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"attempt_failed\""));
        assert!(json.contains("\"retry_in_ms\":1000"));

        let parsed: PipelineEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_event_levels() {
        let failed = PipelineEvent::DescriptorFailed {
            filename: "hero".to_string(),
            error: "boom".to_string(),
        };
        assert_eq!(failed.level(), Level::ERROR);

        let attempt = PipelineEvent::PlaceholderFallback {
            filename: "hero".to_string(),
            url: "https://picsum.photos/1600/900?random=1".to_string(),
        };
        assert_eq!(attempt.level(), Level::WARN);

        let done = PipelineEvent::BatchCompleted {
            processed: 1,
            failed: 0,
        };
        assert_eq!(done.level(), Level::INFO);
    }

    #[test]
    fn test_event_descriptor() {
        let saved = PipelineEvent::Saved {
            filename: "hero".to_string(),
            path: "/out/hero-orig.jpg".to_string(),
            source: AcquisitionSource::Keyword,
        };
        assert_eq!(saved.descriptor(), Some("hero"));
        assert_eq!(saved.event_type(), "saved");

        let started = PipelineEvent::BatchStarted {
            descriptors: 3,
            optimize: false,
            force: false,
        };
        assert_eq!(started.descriptor(), None);
    }

    #[test]
    fn test_event_messages() {
        let attempt = PipelineEvent::AttemptFailed {
            filename: "hero".to_string(),
            url: "https://example.com/a.jpg".to_string(),
            attempt: 1,
            error: "HTTP 500".to_string(),
            retry_in_ms: 500,
        };
        assert_eq!(
            attempt.to_string(),
            "Attempt 1 failed for https://example.com/a.jpg: HTTP 500. Retrying in 500ms..."
        );

        let saved = PipelineEvent::Saved {
            filename: "hero".to_string(),
            path: "/out/hero-orig.jpg".to_string(),
            source: AcquisitionSource::Curated,
        };
        assert_eq!(saved.to_string(), "Saved: /out/hero-orig.jpg (Pexels)");
    }
}
