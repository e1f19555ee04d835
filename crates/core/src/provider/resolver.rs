//! Provider selection in priority order.

use std::sync::Arc;

use tracing::debug;

use super::types::Candidate;
use super::{KeywordProvider, PexelsClient, ProviderError};
use crate::config::Config;
use crate::fetcher::Fetcher;

/// Picks a remote image source for a query.
pub struct ProviderResolver {
    curated: Option<PexelsClient>,
    keyword: KeywordProvider,
    query_suffix: String,
}

impl ProviderResolver {
    /// Create a resolver from explicit providers.
    pub fn new(
        curated: Option<PexelsClient>,
        keyword: KeywordProvider,
        query_suffix: impl Into<String>,
    ) -> Self {
        Self {
            curated,
            keyword,
            query_suffix: query_suffix.into(),
        }
    }

    /// Build from configuration. The curated provider is enabled only when
    /// `api_key` holds a non-empty credential.
    pub fn from_config(config: &Config, api_key: Option<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        let curated_config = &config.providers.curated;
        let curated = api_key
            .and_then(|key| PexelsClient::new(fetcher, curated_config.base_url.clone(), key).ok());

        Self::new(
            curated,
            KeywordProvider::new(config.providers.keyword.clone()),
            curated_config.query_suffix.clone(),
        )
    }

    /// Whether a curated credential is configured.
    pub fn has_curated(&self) -> bool {
        self.curated.is_some()
    }

    /// Curated candidate for a descriptor query.
    ///
    /// Returns `Ok(None)` without issuing any request when no credential is configured.
    pub async fn resolve_curated(&self, query: &str) -> Result<Option<Candidate>, ProviderError> {
        let Some(client) = &self.curated else {
            return Ok(None);
        };

        let search_query = format!("{}{}", query, self.query_suffix);
        client.search_best(&search_query, query).await.map(Some)
    }

    /// Keyword candidate for a descriptor query.
    pub fn keyword_candidate(&self, query: &str) -> Candidate {
        self.keyword.candidate(query)
    }

    /// First candidate in priority order. Curated failures fall through.
    pub async fn resolve(&self, query: &str) -> Candidate {
        match self.resolve_curated(query).await {
            Ok(Some(candidate)) => candidate,
            Ok(None) => self.keyword_candidate(query),
            Err(e) => {
                debug!("Curated provider failed for '{}': {}", query, e);
                self.keyword_candidate(query)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;
    use crate::testing::{fixtures, MockFetcher, MockResponse};

    fn resolver(fetcher: &MockFetcher, api_key: Option<&str>) -> ProviderResolver {
        ProviderResolver::from_config(
            &Config::default(),
            api_key.map(str::to_string),
            Arc::new(fetcher.clone()),
        )
    }

    #[tokio::test]
    async fn test_no_credential_issues_no_request() {
        let fetcher = MockFetcher::new();
        let resolver = resolver(&fetcher, None);

        assert!(!resolver.has_curated());
        assert!(resolver.resolve_curated("pasta").await.unwrap().is_none());

        let candidate = resolver.resolve("pasta").await;
        assert_eq!(candidate.provider, ProviderKind::Keyword);
        assert_eq!(fetcher.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_empty_credential_disables_curated() {
        let fetcher = MockFetcher::new();
        assert!(!resolver(&fetcher, Some("")).has_curated());
    }

    #[tokio::test]
    async fn test_curated_search_appends_suffix() {
        let fetcher = MockFetcher::new();
        fetcher
            .respond(
                "https://api.pexels.com",
                MockResponse::Body(fixtures::pexels_response(
                    7,
                    "Chef",
                    "https://images.pexels.com/photos/7/xl.jpg",
                )),
            )
            .await;
        let resolver = resolver(&fetcher, Some("key"));

        let candidate = resolver.resolve("pasta").await;
        assert_eq!(candidate.provider, ProviderKind::Curated);
        assert_eq!(candidate.url, "https://images.pexels.com/photos/7/xl.jpg");

        let requests = fetcher.requests().await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("query=pasta%20food"));
    }

    #[tokio::test]
    async fn test_curated_failure_falls_through_to_keyword() {
        let fetcher = MockFetcher::new();
        fetcher
            .respond("https://api.pexels.com", MockResponse::Status(500))
            .await;
        let resolver = resolver(&fetcher, Some("key"));

        assert!(resolver.resolve_curated("pasta").await.is_err());

        let candidate = resolver.resolve("pasta").await;
        assert_eq!(candidate.provider, ProviderKind::Keyword);
        assert_eq!(
            candidate.url,
            "https://source.unsplash.com/1600x900/?pasta,food"
        );
    }
}
