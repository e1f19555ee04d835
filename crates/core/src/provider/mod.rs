//! Remote image providers and the resolver that picks between them.
//!
//! Priority order: the curated photo search API (only when a credential is
//! configured), then the keyword-based random photo service. The generic
//! placeholder service is not a provider of its own; the downloader reaches
//! for it once retries against the keyword URL are exhausted.

mod keyword;
mod pexels;
mod placeholder;
mod resolver;
mod types;

pub use keyword::KeywordProvider;
pub use pexels::PexelsClient;
pub use placeholder::placeholder_url;
pub use resolver::ProviderResolver;
pub use types::*;

use thiserror::Error;

use crate::fetcher::FetchError;

/// Errors that can occur when resolving a provider candidate.
///
/// All of them are recoverable: the resolver falls through to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),

    /// Request to the provider failed.
    #[error("Provider request failed: {0}")]
    Fetch(#[from] FetchError),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Search returned no photos.
    #[error("No photos found for: {query}")]
    NoResults { query: String },

    /// The best match carries no usable image URL.
    #[error("Photo {photo_id} has no usable image variant")]
    NoUsableSource { photo_id: u64 },
}
