use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub optimize: OptimizeConfig,
}

/// Where descriptors are read from and images are written to
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output directory for originals, derivatives and attribution records
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// JSON file holding the `{filename, query}` descriptor list
    #[serde(default = "default_images_file")]
    pub images_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            images_file: default_images_file(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/images")
}

fn default_images_file() -> PathBuf {
    PathBuf::from("images.json")
}

/// Remote image providers, in priority order
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub curated: CuratedConfig,
    #[serde(default)]
    pub keyword: KeywordConfig,
    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// Curated photo search API (Pexels)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CuratedConfig {
    /// API base URL (default: https://api.pexels.com/v1)
    #[serde(default = "default_curated_base_url")]
    pub base_url: String,
    /// API key. The `PEXELS_API_KEY` / `PEXELS_KEY` environment variables take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Appended to every descriptor query before searching
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,
}

impl Default for CuratedConfig {
    fn default() -> Self {
        Self {
            base_url: default_curated_base_url(),
            api_key: None,
            query_suffix: default_query_suffix(),
        }
    }
}

fn default_curated_base_url() -> String {
    "https://api.pexels.com/v1".to_string()
}

fn default_query_suffix() -> String {
    " food".to_string()
}

/// Keyword-based random photo service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KeywordConfig {
    #[serde(default = "default_keyword_base_url")]
    pub base_url: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Fixed tag appended to the query terms
    #[serde(default = "default_category")]
    pub category: String,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            base_url: default_keyword_base_url(),
            width: default_width(),
            height: default_height(),
            category: default_category(),
        }
    }
}

fn default_keyword_base_url() -> String {
    "https://source.unsplash.com".to_string()
}

fn default_category() -> String {
    "food".to_string()
}

/// Generic placeholder service used after all retries are exhausted
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_placeholder_base_url")]
    pub base_url: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Exclusive upper bound of the cache-busting `random` parameter
    #[serde(default = "default_random_max")]
    pub random_max: u32,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            base_url: default_placeholder_base_url(),
            width: default_width(),
            height: default_height(),
            random_max: default_random_max(),
        }
    }
}

fn default_placeholder_base_url() -> String {
    "https://picsum.photos".to_string()
}

fn default_random_max() -> u32 {
    100_000
}

fn default_width() -> u32 {
    1600
}

fn default_height() -> u32 {
    900
}

/// Download retry policy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Attempts against the primary URL before falling back to the placeholder
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles after each further failure
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    4
}

fn default_base_delay_ms() -> u64 {
    500
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("stockpot/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Derivative generation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizeConfig {
    #[serde(default = "default_widths")]
    pub widths: Vec<u32>,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "default_webp_quality")]
    pub webp_quality: u8,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            widths: default_widths(),
            jpeg_quality: default_jpeg_quality(),
            webp_quality: default_webp_quality(),
        }
    }
}

fn default_widths() -> Vec<u32> {
    vec![1600, 800, 400]
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_webp_quality() -> u8 {
    75
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub output: OutputConfig,
    pub providers: SanitizedProvidersConfig,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub optimize: OptimizeConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedProvidersConfig {
    pub curated: SanitizedCuratedConfig,
    pub keyword: KeywordConfig,
    pub placeholder: PlaceholderConfig,
}

/// Sanitized curated provider config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCuratedConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub query_suffix: String,
}

impl SanitizedConfig {
    /// `api_key_configured` reflects the resolved credential, which may come
    /// from the environment rather than the file.
    pub fn new(config: &Config, api_key_configured: bool) -> Self {
        let curated = &config.providers.curated;
        Self {
            output: config.output.clone(),
            providers: SanitizedProvidersConfig {
                curated: SanitizedCuratedConfig {
                    base_url: curated.base_url.clone(),
                    api_key_configured,
                    query_suffix: curated.query_suffix.clone(),
                },
                keyword: config.providers.keyword.clone(),
                placeholder: config.providers.placeholder.clone(),
            },
            retry: config.retry.clone(),
            http: config.http.clone(),
            optimize: config.optimize.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("assets/images"));
        assert_eq!(config.output.images_file, PathBuf::from("images.json"));
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.base_delay_ms, 500);
        assert_eq!(config.optimize.widths, vec![1600, 800, 400]);
        assert_eq!(config.optimize.jpeg_quality, 80);
        assert_eq!(config.optimize.webp_quality, 75);
        assert_eq!(config.providers.curated.query_suffix, " food");
        assert!(config.providers.curated.api_key.is_none());
        assert!(config.http.timeout_secs.is_none());
    }

    #[test]
    fn test_deserialize_provider_overrides() {
        let toml = r#"
[providers.keyword]
base_url = "http://localhost:9000"
width = 800
height = 600
category = "dessert"

[providers.placeholder]
random_max = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.providers.keyword.base_url, "http://localhost:9000");
        assert_eq!(config.providers.keyword.width, 800);
        assert_eq!(config.providers.keyword.category, "dessert");
        assert_eq!(config.providers.placeholder.random_max, 10);
        assert_eq!(config.providers.placeholder.width, 1600); // default
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let mut config = Config::default();
        config.providers.curated.api_key = Some("secret-key".to_string());

        let sanitized = SanitizedConfig::new(&config, true);
        assert!(sanitized.providers.curated.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn test_sanitized_config_reports_key_from_environment() {
        let config = Config::default();
        let lookup = |name: &str| (name == "PEXELS_KEY").then(|| "env-key".to_string());
        let api_key = crate::config::resolve_api_key(&config, lookup);

        let sanitized = SanitizedConfig::new(&config, api_key.is_some());
        assert!(sanitized.providers.curated.api_key_configured);
        assert!(!serde_json::to_string(&sanitized).unwrap().contains("env-key"));
    }

    #[test]
    fn test_sanitized_config_without_key() {
        let sanitized = SanitizedConfig::new(&Config::default(), false);
        assert!(!sanitized.providers.curated.api_key_configured);
    }
}
