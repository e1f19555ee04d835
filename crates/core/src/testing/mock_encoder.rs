//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encoder::{Derivative, EncodeError, EncodeJob, Encoder};

/// A recorded encode job for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The job that was submitted.
    pub job: EncodeJob,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Writes nothing; returns the derivative list the plan describes.
/// Base names registered with [`MockEncoder::fail_for`] fail with a decode error.
#[derive(Debug, Clone, Default)]
pub struct MockEncoder {
    /// Recorded jobs.
    jobs: Arc<RwLock<Vec<RecordedEncode>>>,
    /// Base names whose encode fails.
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every job for `base_name` fail.
    pub async fn fail_for(&self, base_name: impl Into<String>) {
        self.failing.write().await.insert(base_name.into());
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<RecordedEncode> {
        self.jobs.read().await.clone()
    }

    /// Base names of successful jobs, in order.
    pub async fn encoded_base_names(&self) -> Vec<String> {
        self.jobs
            .read()
            .await
            .iter()
            .filter(|r| r.success)
            .map(|r| r.job.base_name.clone())
            .collect()
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<Vec<Derivative>, EncodeError> {
        let fail = self.failing.read().await.contains(&job.base_name);

        self.jobs.write().await.push(RecordedEncode {
            job: job.clone(),
            success: !fail,
        });

        if fail {
            return Err(EncodeError::Decode {
                path: job.source.clone(),
                reason: "mock decode failure".to_string(),
            });
        }

        Ok(job
            .plan
            .specs()
            .iter()
            .map(|spec| Derivative {
                path: job.output_dir.join(spec.file_name(&job.base_name)),
                width: spec.width,
                height: spec.width * 9 / 16,
                format: spec.format,
                size_bytes: 1024,
            })
            .collect())
    }
}
