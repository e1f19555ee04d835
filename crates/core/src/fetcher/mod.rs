//! HTTP fetching and the download-with-retry policy.
//!
//! [`Fetcher`] is the single network seam of the pipeline: curated searches,
//! primary downloads and placeholder downloads all go through it, so a mock
//! fetcher observes every request a run makes.

mod http;
mod retry;

pub use http::HttpFetcher;
pub use retry::{backoff_delay, DownloadError, DownloadOrigin, Downloader};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Transport failure described as text (used by non-reqwest fetchers).
    #[error("Network error: {0}")]
    Network(String),
}

impl FetchError {
    /// HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Network(_) => None,
        }
    }
}

/// A GET request with optional headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// Plain GET of `url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Fetches the full body of a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetch the whole response body. Non-2xx responses are errors.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError>;
}
