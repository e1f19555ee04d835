use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one download attempt
/// - Derivative widths are present and non-zero
/// - Encoder qualities are within 1..=100
/// - Keyword and placeholder image sizes are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "retry.max_attempts must be at least 1".to_string(),
        ));
    }

    if config.optimize.widths.is_empty() {
        return Err(ConfigError::ValidationError(
            "optimize.widths cannot be empty".to_string(),
        ));
    }
    if config.optimize.widths.contains(&0) {
        return Err(ConfigError::ValidationError(
            "optimize.widths cannot contain 0".to_string(),
        ));
    }

    for (name, quality) in [
        ("optimize.jpeg_quality", config.optimize.jpeg_quality),
        ("optimize.webp_quality", config.optimize.webp_quality),
    ] {
        if !(1..=100).contains(&quality) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between 1 and 100, got {}",
                name, quality
            )));
        }
    }

    let keyword = &config.providers.keyword;
    let placeholder = &config.providers.placeholder;
    if keyword.width == 0 || keyword.height == 0 {
        return Err(ConfigError::ValidationError(
            "providers.keyword size cannot be 0".to_string(),
        ));
    }
    if placeholder.width == 0 || placeholder.height == 0 || placeholder.random_max == 0 {
        return Err(ConfigError::ValidationError(
            "providers.placeholder size and random_max cannot be 0".to_string(),
        ));
    }

    Ok(())
}
