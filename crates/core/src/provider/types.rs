//! Provider candidate types and the curated API response schema.

use serde::{Deserialize, Serialize};

/// Which provider produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Curated,
    Keyword,
}

/// Photographer credit for a curated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub photographer: String,
    /// Provider-side photo ID.
    pub provider_id: u64,
    /// Descriptor query the photo was found for.
    pub query: String,
}

/// A single URL to download, with attribution when the provider supplies one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub provider: ProviderKind,
    pub attribution: Option<Attribution>,
}

// ============================================================================
// Pexels API Types
// ============================================================================

/// Search response from the curated photo API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PexelsSearchResponse {
    pub photos: Vec<PexelsPhoto>,
}

/// A photo in a search response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PexelsPhoto {
    pub id: u64,
    pub photographer: String,
    pub src: PexelsPhotoSrc,
}

/// Resolution variants of a photo.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PexelsPhotoSrc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large2x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl PexelsPhotoSrc {
    /// Highest available variant: extra-large, then large, then original.
    pub fn best(&self) -> Option<&str> {
        [&self.large2x, &self.large, &self.original]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_prefers_large2x() {
        let src = PexelsPhotoSrc {
            large2x: Some("xl".to_string()),
            large: Some("l".to_string()),
            original: Some("o".to_string()),
        };
        assert_eq!(src.best(), Some("xl"));
    }

    #[test]
    fn test_best_falls_back_in_order() {
        let src = PexelsPhotoSrc {
            large2x: Some(String::new()),
            large: None,
            original: Some("o".to_string()),
        };
        assert_eq!(src.best(), Some("o"));
        assert_eq!(PexelsPhotoSrc::default().best(), None);
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "page": 1,
            "photos": [{
                "id": 1640777,
                "photographer": "Ella Olsson",
                "src": {"large2x": "https://images.pexels.com/1640777/xl.jpg", "tiny": "t.jpg"}
            }]
        }"#;
        let response: PexelsSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.photos.len(), 1);
        assert_eq!(response.photos[0].photographer, "Ella Olsson");
        assert_eq!(
            response.photos[0].src.best(),
            Some("https://images.pexels.com/1640777/xl.jpg")
        );
    }

    #[test]
    fn test_parse_rejects_missing_photographer() {
        let json = r#"{"photos": [{"id": 1, "src": {}}]}"#;
        assert!(serde_json::from_str::<PexelsSearchResponse>(json).is_err());
    }
}
