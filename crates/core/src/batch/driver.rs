//! Sequential batch driver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::types::{
    AcquisitionResult, AcquisitionSource, AttributionRecord, BatchReport, DescriptorReport,
    RunOptions,
};
use crate::atomic_write::write_atomic;
use crate::config::Config;
use crate::descriptor::{duplicate_filenames, ImageDescriptor};
use crate::encoder::{DerivativePlan, EncodeError, EncodeJob, Encoder};
use crate::events::{EventSink, PipelineEvent};
use crate::fetcher::{DownloadOrigin, Downloader, Fetcher};
use crate::provider::{Attribution, Candidate, ProviderResolver};

/// Error that aborts the whole run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error that aborts a single descriptor. Logged, never escalated.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Attribution record could not be written.
    #[error("Failed to write attribution record {path}: {source}")]
    Attribution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Attribution record could not be serialized.
    #[error("Failed to serialize attribution record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Derivative generation failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Run-wide settings handed to the driver at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub output_dir: PathBuf,
    pub plan: DerivativePlan,
}

impl BatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output.dir.clone(),
            plan: DerivativePlan::from_config(&config.optimize),
        }
    }
}

/// Processes descriptors one at a time, in list order.
pub struct BatchDriver {
    settings: BatchSettings,
    resolver: ProviderResolver,
    downloader: Downloader,
    encoder: Arc<dyn Encoder>,
    sink: Arc<dyn EventSink>,
}

impl BatchDriver {
    pub fn new(
        settings: BatchSettings,
        resolver: ProviderResolver,
        downloader: Downloader,
        encoder: Arc<dyn Encoder>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            settings,
            resolver,
            downloader,
            encoder,
            sink,
        }
    }

    /// Wire a driver from configuration.
    ///
    /// `api_key` is the resolved curated credential; `None` disables the curated provider.
    pub fn from_config(
        config: &Config,
        api_key: Option<String>,
        fetcher: Arc<dyn Fetcher>,
        encoder: Arc<dyn Encoder>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let resolver = ProviderResolver::from_config(config, api_key, Arc::clone(&fetcher));
        let downloader = Downloader::new(
            fetcher,
            config.retry.clone(),
            config.providers.placeholder.clone(),
            Arc::clone(&sink),
        );

        Self::new(
            BatchSettings::from_config(config),
            resolver,
            downloader,
            encoder,
            sink,
        )
    }

    pub fn settings(&self) -> &BatchSettings {
        &self.settings
    }

    /// Process every descriptor.
    ///
    /// Only a failure to create the output directory is returned as an error;
    /// per-descriptor failures are emitted and recorded in the report.
    pub async fn run(
        &self,
        descriptors: &[ImageDescriptor],
        options: RunOptions,
    ) -> Result<BatchReport, BatchError> {
        let output_dir = &self.settings.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| BatchError::OutputDirectory {
                path: output_dir.clone(),
                source: e,
            })?;

        self.sink.emit(PipelineEvent::BatchStarted {
            descriptors: descriptors.len(),
            optimize: options.optimize,
            force: options.force,
        });
        for filename in duplicate_filenames(descriptors) {
            self.sink.emit(PipelineEvent::DuplicateFilename { filename });
        }

        let mut report = BatchReport::default();
        for descriptor in descriptors {
            report.descriptors.push(self.process(descriptor, options).await);
        }

        self.sink.emit(PipelineEvent::BatchCompleted {
            processed: report.processed(),
            failed: report.failed(),
        });

        Ok(report)
    }

    async fn process(&self, descriptor: &ImageDescriptor, options: RunOptions) -> DescriptorReport {
        let mut report = DescriptorReport::new(&descriptor.filename);

        if let Err(e) = self.process_inner(descriptor, options, &mut report).await {
            self.sink.emit(PipelineEvent::DescriptorFailed {
                filename: descriptor.filename.clone(),
                error: e.to_string(),
            });
            report.error = Some(e.to_string());
        }

        report
    }

    async fn process_inner(
        &self,
        descriptor: &ImageDescriptor,
        options: RunOptions,
        report: &mut DescriptorReport,
    ) -> Result<(), ProcessError> {
        let output_dir = &self.settings.output_dir;
        let original = descriptor.original_path(output_dir);

        if original.exists() && !options.force {
            self.sink.emit(PipelineEvent::SkippedExisting {
                filename: descriptor.filename.clone(),
                path: original.display().to_string(),
            });
            report.acquisition = Some(AcquisitionResult {
                descriptor: descriptor.clone(),
                original_path: original.clone(),
                source: AcquisitionSource::CacheHit,
                attribution: None,
            });
        } else {
            self.sink.emit(PipelineEvent::Preparing {
                filename: descriptor.filename.clone(),
                query: descriptor.query.clone(),
            });
            report.acquisition = self.acquire(descriptor, &original).await;
            if report.acquisition.is_none() {
                self.sink.emit(PipelineEvent::AcquisitionFailed {
                    filename: descriptor.filename.clone(),
                });
            }
        }

        if options.optimize {
            if !original.exists() {
                self.sink.emit(PipelineEvent::OptimizeSkipped {
                    filename: descriptor.filename.clone(),
                    reason: "original is missing".to_string(),
                });
                return Ok(());
            }

            self.sink.emit(PipelineEvent::Optimizing {
                filename: descriptor.filename.clone(),
            });
            let job = EncodeJob {
                source: original,
                output_dir: output_dir.clone(),
                base_name: descriptor.filename.clone(),
                plan: self.settings.plan.clone(),
            };
            let derivatives = self.encoder.encode(&job).await?;

            self.sink.emit(PipelineEvent::Optimized {
                filename: descriptor.filename.clone(),
                derivatives: derivatives.len(),
            });
            report.derivatives = derivatives.into_iter().map(|d| d.path).collect();
        }

        Ok(())
    }

    /// Obtain the original: curated candidate once, then keyword with retries.
    async fn acquire(
        &self,
        descriptor: &ImageDescriptor,
        original: &Path,
    ) -> Option<AcquisitionResult> {
        let filename = &descriptor.filename;

        match self.resolver.resolve_curated(&descriptor.query).await {
            Ok(Some(candidate)) => {
                if let Some(result) = self.try_curated(descriptor, original, candidate).await {
                    return Some(result);
                }
            }
            Ok(None) => debug!("No curated credential; using keyword provider for {}", filename),
            Err(e) => self.sink.emit(PipelineEvent::CuratedFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            }),
        }

        let candidate = self.resolver.keyword_candidate(&descriptor.query);
        let origin = self
            .downloader
            .download_with_retry(
                filename,
                &candidate.url,
                original,
                self.downloader.max_attempts(),
            )
            .await?;

        let source = match origin {
            DownloadOrigin::Primary => AcquisitionSource::Keyword,
            DownloadOrigin::Placeholder => AcquisitionSource::Placeholder,
        };
        self.remove_stale_attribution(descriptor).await;
        self.sink.emit(PipelineEvent::Saved {
            filename: filename.clone(),
            path: original.display().to_string(),
            source,
        });

        Some(AcquisitionResult {
            descriptor: descriptor.clone(),
            original_path: original.to_path_buf(),
            source,
            attribution: None,
        })
    }

    /// Single download of the curated candidate. `None` falls through.
    ///
    /// A failed attribution write is reported but keeps the saved original.
    async fn try_curated(
        &self,
        descriptor: &ImageDescriptor,
        original: &Path,
        candidate: Candidate,
    ) -> Option<AcquisitionResult> {
        let filename = &descriptor.filename;

        self.sink.emit(PipelineEvent::DownloadingCurated {
            filename: filename.clone(),
            url: candidate.url.clone(),
        });

        if let Err(e) = self.downloader.download_once(&candidate.url, original).await {
            self.sink.emit(PipelineEvent::CuratedFailed {
                filename: filename.clone(),
                reason: e.to_string(),
            });
            return None;
        }

        if let Some(attribution) = &candidate.attribution {
            if let Err(e) = self.write_attribution(descriptor, attribution).await {
                self.sink.emit(PipelineEvent::AttributionFailed {
                    filename: filename.clone(),
                    error: e.to_string(),
                });
            }
        }

        self.sink.emit(PipelineEvent::Saved {
            filename: filename.clone(),
            path: original.display().to_string(),
            source: AcquisitionSource::Curated,
        });

        Some(AcquisitionResult {
            descriptor: descriptor.clone(),
            original_path: original.to_path_buf(),
            source: AcquisitionSource::Curated,
            attribution: candidate.attribution,
        })
    }

    async fn write_attribution(
        &self,
        descriptor: &ImageDescriptor,
        attribution: &Attribution,
    ) -> Result<(), ProcessError> {
        let path = descriptor.meta_path(&self.settings.output_dir);
        let json = serde_json::to_string_pretty(&AttributionRecord::curated(attribution))?;

        write_atomic(&path, json.as_bytes())
            .await
            .map_err(|e| ProcessError::Attribution { path, source: e })
    }

    /// A replaced original must not keep a previous run's photographer credit.
    async fn remove_stale_attribution(&self, descriptor: &ImageDescriptor) {
        let path = descriptor.meta_path(&self.settings.output_dir);
        if path.exists() {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                debug!("Could not remove stale {}: {}", path.display(), e);
            }
        }
    }
}
