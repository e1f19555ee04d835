//! Keyword-based random photo service.

use super::types::{Candidate, ProviderKind};
use crate::config::KeywordConfig;

/// Builds deterministic keyword URLs; never issues a request itself.
#[derive(Debug, Clone)]
pub struct KeywordProvider {
    config: KeywordConfig,
}

impl KeywordProvider {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// `<base>/<w>x<h>/?<query>,<category>`
    pub fn candidate(&self, query: &str) -> Candidate {
        let url = format!(
            "{}/{}x{}/?{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.width,
            self.config.height,
            urlencoding::encode(query),
            self.config.category
        );

        Candidate {
            url,
            provider: ProviderKind::Keyword,
            attribution: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_candidate_url() {
        let provider = KeywordProvider::new(KeywordConfig::default());
        let candidate = provider.candidate("grilled salmon");
        assert_eq!(
            candidate.url,
            "https://source.unsplash.com/1600x900/?grilled%20salmon,food"
        );
        assert_eq!(candidate.provider, ProviderKind::Keyword);
        assert!(candidate.attribution.is_none());
    }

    #[test]
    fn test_keyword_candidate_is_deterministic() {
        let provider = KeywordProvider::new(KeywordConfig {
            base_url: "http://localhost:8000/".to_string(),
            width: 800,
            height: 600,
            category: "dessert".to_string(),
        });
        let first = provider.candidate("tiramisu");
        assert_eq!(first.url, "http://localhost:8000/800x600/?tiramisu,dessert");
        assert_eq!(first, provider.candidate("tiramisu"));
    }
}
