use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variables checked for the curated provider credential, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["PEXELS_API_KEY", "PEXELS_KEY"];

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("STOCKPOT_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load built-in defaults with environment variable overrides
pub fn load_default_config() -> Result<Config, ConfigError> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("STOCKPOT_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Resolve the curated provider credential.
///
/// The first non-empty variable from [`API_KEY_ENV_VARS`] wins, then the
/// configured `providers.curated.api_key`.
pub fn resolve_api_key<F>(config: &Config, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .find(|value| !value.is_empty())
        .or_else(|| {
            config
                .providers
                .curated
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[output]
dir = "public/img"

[retry]
max_attempts = 2
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.output.dir.to_str().unwrap(), "public/img");
        assert_eq!(config.retry.max_attempts, 2);
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[retry]
max_attempts = "four"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/stockpot.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[output]
dir = "site/assets/images"
images_file = "scripts/images.json"

[optimize]
widths = [1200, 600]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.output.dir.to_str().unwrap(), "site/assets/images");
        assert_eq!(
            config.output.images_file.to_str().unwrap(),
            "scripts/images.json"
        );
        assert_eq!(config.optimize.widths, vec![1200, 600]);
        assert_eq!(config.optimize.jpeg_quality, 80);
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_resolve_api_key_primary_name_wins() {
        let config = Config::default();
        let lookup = lookup_from(&[("PEXELS_API_KEY", "first"), ("PEXELS_KEY", "second")]);
        assert_eq!(resolve_api_key(&config, lookup).as_deref(), Some("first"));
    }

    #[test]
    fn test_resolve_api_key_alternate_name() {
        let config = Config::default();
        let lookup = lookup_from(&[("PEXELS_KEY", "second")]);
        assert_eq!(resolve_api_key(&config, lookup).as_deref(), Some("second"));
    }

    #[test]
    fn test_resolve_api_key_skips_empty_values() {
        let config = Config::default();
        let lookup = lookup_from(&[("PEXELS_API_KEY", ""), ("PEXELS_KEY", "second")]);
        assert_eq!(resolve_api_key(&config, lookup).as_deref(), Some("second"));
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_config() {
        let mut config = Config::default();
        config.providers.curated.api_key = Some("from-file".to_string());
        assert_eq!(
            resolve_api_key(&config, lookup_from(&[])).as_deref(),
            Some("from-file")
        );
    }

    #[test]
    fn test_resolve_api_key_absent() {
        let config = Config::default();
        assert!(resolve_api_key(&config, lookup_from(&[])).is_none());
    }
}
