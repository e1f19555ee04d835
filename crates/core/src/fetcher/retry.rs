//! Download-with-retry: exponential backoff, then a placeholder fallback.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use super::{FetchError, FetchRequest, Fetcher};
use crate::atomic_write::write_atomic;
use crate::config::{PlaceholderConfig, RetryConfig};
use crate::events::{EventSink, PipelineEvent};
use crate::provider::placeholder_url;

/// Errors from a single download attempt.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The fetch itself failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The bytes could not be written to the destination.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which URL a successful download came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOrigin {
    /// The URL the caller asked for.
    Primary,
    /// The generic placeholder service, after all primary attempts failed.
    Placeholder,
}

/// Delay after the failed attempt with the given 0-based index: `base * 2^index`.
pub fn backoff_delay(base_ms: u64, attempt_index: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt_index).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Downloads URLs to local files, retrying with exponential backoff.
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    retry: RetryConfig,
    placeholder: PlaceholderConfig,
    sink: Arc<dyn EventSink>,
}

impl Downloader {
    /// Create a new downloader.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        retry: RetryConfig,
        placeholder: PlaceholderConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            fetcher,
            retry,
            placeholder,
            sink,
        }
    }

    /// Configured number of primary attempts.
    pub fn max_attempts(&self) -> u32 {
        self.retry.max_attempts
    }

    /// Fetch `url` once and write it to `dest`. Returns the number of bytes written.
    pub async fn download_once(&self, url: &str, dest: &Path) -> Result<usize, DownloadError> {
        let bytes = self.fetcher.fetch(&FetchRequest::get(url)).await?;

        write_atomic(dest, &bytes)
            .await
            .map_err(|e| DownloadError::Write {
                path: dest.display().to_string(),
                source: e,
            })?;

        Ok(bytes.len())
    }

    /// Download `url` to `dest` with up to `attempts` tries.
    ///
    /// Every failed attempt is followed by a backoff wait, including the last.
    /// Once attempts are exhausted a single placeholder download is tried.
    /// Returns `None` when everything failed; `dest` is then left untouched.
    pub async fn download_with_retry(
        &self,
        filename: &str,
        url: &str,
        dest: &Path,
        attempts: u32,
    ) -> Option<DownloadOrigin> {
        for attempt_index in 0..attempts {
            match self.download_once(url, dest).await {
                Ok(_) => return Some(DownloadOrigin::Primary),
                Err(e) => {
                    let wait = backoff_delay(self.retry.base_delay_ms, attempt_index);
                    self.sink.emit(PipelineEvent::AttemptFailed {
                        filename: filename.to_string(),
                        url: url.to_string(),
                        attempt: attempt_index + 1,
                        error: e.to_string(),
                        retry_in_ms: millis(wait),
                    });
                    tokio::time::sleep(wait).await;
                }
            }
        }

        let random = rand::thread_rng().gen_range(0..self.placeholder.random_max.max(1));
        let fallback_url = placeholder_url(&self.placeholder, random);
        self.sink.emit(PipelineEvent::PlaceholderFallback {
            filename: filename.to_string(),
            url: fallback_url.clone(),
        });

        match self.download_once(&fallback_url, dest).await {
            Ok(_) => Some(DownloadOrigin::Placeholder),
            Err(e) => {
                self.sink.emit(PipelineEvent::PlaceholderFailed {
                    filename: filename.to_string(),
                    error: e.to_string(),
                });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delay_doubles() {
        let delays: Vec<u64> = (0..4)
            .map(|i| millis(backoff_delay(500, i)))
            .collect();
        assert_eq!(delays, vec![500, 1000, 2000, 4000]);
    }

    #[test]
    fn test_millis_saturates() {
        assert_eq!(millis(Duration::from_millis(4000)), 4000);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_backoff_delay_saturates() {
        assert_eq!(backoff_delay(500, 64), Duration::from_millis(u64::MAX));
        assert_eq!(backoff_delay(0, 3), Duration::ZERO);
    }
}
