//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the pipeline's seams,
//! allowing the batch driver and downloader to be exercised without network
//! access or real image codecs.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockpot_core::testing::{MockEncoder, MockFetcher, MockResponse, RecordingSink};
//!
//! let fetcher = MockFetcher::new();
//! let encoder = MockEncoder::new();
//! let sink = RecordingSink::new();
//!
//! // Configure mock responses
//! fetcher.respond("https://source.unsplash.com", MockResponse::Body(fixtures::sample_jpeg(64, 36))).await;
//! encoder.fail_for("broken").await;
//! ```

mod mock_encoder;
mod mock_fetcher;
mod recording_sink;

pub use mock_encoder::{MockEncoder, RecordedEncode};
pub use mock_fetcher::{MockFetcher, MockResponse};
pub use recording_sink::RecordingSink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use image::codecs::jpeg::JpegEncoder;
    use image::{ColorType, Rgb, RgbImage};

    use crate::descriptor::ImageDescriptor;

    /// Create a test descriptor.
    pub fn descriptor(filename: &str, query: &str) -> ImageDescriptor {
        ImageDescriptor::new(filename, query)
    }

    /// A small valid JPEG with a gradient, `width` x `height`.
    pub fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ])
        });

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, 90)
            .encode(image.as_raw(), width, height, ColorType::Rgb8.into())
            .expect("encode sample jpeg");
        buffer
    }

    /// Curated search response body with a single photo.
    pub fn pexels_response(id: u64, photographer: &str, large2x: &str) -> Vec<u8> {
        serde_json::json!({
            "page": 1,
            "per_page": 1,
            "photos": [{
                "id": id,
                "photographer": photographer,
                "src": {
                    "original": format!("https://images.pexels.com/photos/{}/original.jpeg", id),
                    "large2x": large2x,
                    "large": format!("https://images.pexels.com/photos/{}/large.jpeg", id),
                }
            }]
        })
        .to_string()
        .into_bytes()
    }
}
