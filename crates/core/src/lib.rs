//! Stock photo acquisition for static site image assets.
//!
//! For each `{filename, query}` descriptor the pipeline obtains one original
//! (curated search, keyword service, placeholder), writes it next to an
//! optional attribution record, and can re-encode it into a fixed set of
//! resized JPEG and WebP derivatives.

mod atomic_write;

pub mod batch;
pub mod config;
pub mod descriptor;
pub mod encoder;
pub mod events;
pub mod fetcher;
pub mod provider;
pub mod testing;

pub use batch::{
    AcquisitionResult, AcquisitionSource, AttributionRecord, BatchDriver, BatchError,
    BatchReport, BatchSettings, DescriptorReport, RunOptions,
};
pub use config::{
    load_config, load_config_from_str, load_default_config, resolve_api_key, validate_config,
    Config, ConfigError, SanitizedConfig,
};
pub use descriptor::{load_descriptors, DescriptorError, ImageDescriptor};
pub use encoder::{DerivativePlan, EncodeError, Encoder, ImageEncoder};
pub use events::{EventSink, PipelineEvent, TracingSink};
pub use fetcher::{Downloader, FetchError, Fetcher, HttpFetcher};
pub use provider::{ProviderError, ProviderResolver};
