//! Curated photo search client (Pexels).
//!
//! Requires an API key, sent verbatim in the `Authorization` header.
//! Only the single best match is requested.

use std::sync::Arc;

use tracing::debug;

use super::types::{Attribution, Candidate, PexelsSearchResponse, ProviderKind};
use super::ProviderError;
use crate::fetcher::{FetchRequest, Fetcher};

/// Curated photo search client.
pub struct PexelsClient {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    api_key: String,
}

impl PexelsClient {
    /// Create a new client. Fails when the API key is empty.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Pexels API key is required".to_string(),
            ));
        }

        Ok(Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// URL of a single-result search for `query`.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?query={}&per_page=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Search for `search_query` and return the best match as a candidate.
    ///
    /// `descriptor_query` is recorded in the attribution.
    pub async fn search_best(
        &self,
        search_query: &str,
        descriptor_query: &str,
    ) -> Result<Candidate, ProviderError> {
        debug!("Pexels search: query='{}'", search_query);

        let request = FetchRequest::get(self.search_url(search_query))
            .with_header("Authorization", self.api_key.as_str());
        let body = self.fetcher.fetch(&request).await?;

        let response: PexelsSearchResponse = serde_json::from_slice(&body).map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Pexels search response: {}", e))
        })?;

        let photo = response
            .photos
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NoResults {
                query: search_query.to_string(),
            })?;

        let url = photo
            .src
            .best()
            .ok_or(ProviderError::NoUsableSource { photo_id: photo.id })?
            .to_string();

        Ok(Candidate {
            url,
            provider: ProviderKind::Curated,
            attribution: Some(Attribution {
                photographer: photo.photographer,
                provider_id: photo.id,
                query: descriptor_query.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockFetcher, MockResponse};

    const BASE: &str = "https://api.pexels.com/v1";

    fn client(fetcher: &MockFetcher) -> PexelsClient {
        PexelsClient::new(Arc::new(fetcher.clone()), BASE, "test-key").unwrap()
    }

    #[test]
    fn test_new_requires_key() {
        let result = PexelsClient::new(Arc::new(MockFetcher::new()), BASE, "");
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client = client(&MockFetcher::new());
        assert_eq!(
            client.search_url("pasta food"),
            "https://api.pexels.com/v1/search?query=pasta%20food&per_page=1"
        );
    }

    #[tokio::test]
    async fn test_search_best_returns_candidate_with_attribution() {
        let fetcher = MockFetcher::new();
        fetcher
            .respond(
                BASE,
                MockResponse::Body(fixtures::pexels_response(
                    42,
                    "Ella Olsson",
                    "https://images.pexels.com/photos/42/xl.jpg",
                )),
            )
            .await;

        let candidate = client(&fetcher)
            .search_best("pasta food", "pasta")
            .await
            .unwrap();

        assert_eq!(candidate.url, "https://images.pexels.com/photos/42/xl.jpg");
        assert_eq!(candidate.provider, ProviderKind::Curated);
        let attribution = candidate.attribution.unwrap();
        assert_eq!(attribution.photographer, "Ella Olsson");
        assert_eq!(attribution.provider_id, 42);
        assert_eq!(attribution.query, "pasta");

        let requests = fetcher.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].headers,
            vec![("Authorization".to_string(), "test-key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_search_best_no_results() {
        let fetcher = MockFetcher::new();
        fetcher
            .respond(BASE, MockResponse::Body(br#"{"photos": []}"#.to_vec()))
            .await;

        let result = client(&fetcher).search_best("pasta food", "pasta").await;
        assert!(matches!(result, Err(ProviderError::NoResults { .. })));
    }

    #[tokio::test]
    async fn test_search_best_malformed_response() {
        let fetcher = MockFetcher::new();
        fetcher
            .respond(BASE, MockResponse::Body(b"<html>oops</html>".to_vec()))
            .await;

        let result = client(&fetcher).search_best("pasta food", "pasta").await;
        assert!(matches!(result, Err(ProviderError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_search_best_http_error() {
        let fetcher = MockFetcher::new();
        fetcher.respond(BASE, MockResponse::Status(401)).await;

        let result = client(&fetcher).search_best("pasta food", "pasta").await;
        assert!(matches!(result, Err(ProviderError::Fetch(_))));
    }
}
