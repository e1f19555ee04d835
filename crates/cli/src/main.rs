use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockpot_core::{
    load_config, load_default_config, load_descriptors, resolve_api_key, validate_config,
    BatchDriver, Config, Encoder, EventSink, Fetcher, HttpFetcher, ImageEncoder, RunOptions,
    SanitizedConfig, TracingSink,
};

/// Download stock photos for the site and optionally generate resized derivatives.
#[derive(Debug, Parser)]
#[command(name = "stockpot", version)]
struct Cli {
    /// Generate JPEG and WebP derivatives at every configured width
    #[arg(long)]
    optimize: bool,

    /// Re-download originals even when they already exist
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn load(config_path: &Path, explicit: bool) -> Result<Config> {
    if explicit || config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        load_default_config().context("Failed to load default configuration")
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let explicit = std::env::var("STOCKPOT_CONFIG").ok();
    let config_path = explicit
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("stockpot.toml"));

    let config = load(&config_path, explicit.is_some())?;
    validate_config(&config).context("Configuration validation failed")?;

    let api_key = resolve_api_key(&config, |name| std::env::var(name).ok());
    if api_key.is_none() {
        warn!("No Pexels API key configured; using keyword provider only");
    }

    let sanitized = SanitizedConfig::new(&config, api_key.is_some());
    info!(
        "Configuration: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let descriptors = load_descriptors(&config.output.images_file).with_context(|| {
        format!(
            "Failed to load descriptors from {:?}",
            config.output.images_file
        )
    })?;
    info!("Loaded {} image descriptors", descriptors.len());

    let fetcher: Arc<dyn Fetcher> =
        Arc::new(HttpFetcher::new(&config.http).context("Failed to create HTTP client")?);
    let encoder: Arc<dyn Encoder> = Arc::new(ImageEncoder::new());
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink::new());

    let driver = BatchDriver::from_config(&config, api_key, fetcher, encoder, sink);

    let options = RunOptions {
        optimize: cli.optimize,
        force: cli.force,
    };
    let report = driver
        .run(&descriptors, options)
        .await
        .context("Batch run failed")?;

    info!(
        "Finished: {} descriptors, {} downloaded, {} failed",
        report.processed(),
        report.downloaded(),
        report.failed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["stockpot", "--optimize", "--force"]).unwrap();
        assert!(cli.optimize);
        assert!(cli.force);

        let cli = Cli::try_parse_from(["stockpot"]).unwrap();
        assert!(!cli.optimize);
        assert!(!cli.force);
    }

    #[test]
    fn test_cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["stockpot", "--parallel"]).is_err());
    }
}
