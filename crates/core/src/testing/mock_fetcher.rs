//! Mock fetcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, FetchRequest, Fetcher};

/// Canned response for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// 200 with this body.
    Body(Vec<u8>),
    /// Non-success HTTP status.
    Status(u16),
    /// Transport failure before any response.
    NetworkError(String),
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    response: MockResponse,
    failures_remaining: u32,
}

/// Mock implementation of the Fetcher trait.
///
/// Responses are routed by URL prefix; the first matching route wins and
/// unmatched URLs answer 404. Every request is recorded.
///
/// # Example
///
/// ```rust,ignore
/// use stockpot_core::testing::{MockFetcher, MockResponse};
///
/// let fetcher = MockFetcher::new();
/// fetcher.respond("https://source.unsplash.com", MockResponse::Status(503)).await;
/// fetcher.respond("https://picsum.photos", MockResponse::Body(jpeg)).await;
///
/// // ... run the downloader ...
///
/// assert_eq!(fetcher.request_count_matching("https://source.unsplash.com").await, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Recorded requests, in order.
    requests: Arc<RwLock<Vec<FetchRequest>>>,
    /// Configured routes.
    routes: Arc<RwLock<Vec<Route>>>,
}

impl MockFetcher {
    /// Create a new mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every URL starting with `prefix` with `response`.
    pub async fn respond(&self, prefix: impl Into<String>, response: MockResponse) {
        self.fail_then_respond(prefix, 0, response).await;
    }

    /// Answer 503 for the first `failures` matching requests, then `response`.
    pub async fn fail_then_respond(
        &self,
        prefix: impl Into<String>,
        failures: u32,
        response: MockResponse,
    ) {
        self.routes.write().await.push(Route {
            prefix: prefix.into(),
            response,
            failures_remaining: failures,
        });
    }

    /// Get all recorded requests.
    pub async fn requests(&self) -> Vec<FetchRequest> {
        self.requests.read().await.clone()
    }

    /// Number of requests made.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub async fn request_count_matching(&self, prefix: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
        self.requests.write().await.push(request.clone());

        let response = {
            let mut routes = self.routes.write().await;
            match routes
                .iter_mut()
                .find(|route| request.url.starts_with(&route.prefix))
            {
                Some(route) if route.failures_remaining > 0 => {
                    route.failures_remaining -= 1;
                    MockResponse::Status(503)
                }
                Some(route) => route.response.clone(),
                None => MockResponse::Status(404),
            }
        };

        match response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status) => Err(FetchError::Status {
                status,
                url: request.url.clone(),
            }),
            MockResponse::NetworkError(message) => Err(FetchError::Network(message)),
        }
    }
}
