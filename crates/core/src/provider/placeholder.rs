use crate::config::PlaceholderConfig;

/// Placeholder image URL; `random` only defeats caching.
pub fn placeholder_url(config: &PlaceholderConfig, random: u32) -> String {
    format!(
        "{}/{}/{}?random={}",
        config.base_url.trim_end_matches('/'),
        config.width,
        config.height,
        random
    )
}
