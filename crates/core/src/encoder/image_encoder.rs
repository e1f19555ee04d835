//! Derivative encoder backed by the `image` and `webp` crates.

use std::path::Path;

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, GenericImageView, ImageReader, RgbImage};
use tracing::debug;

use super::error::EncodeError;
use super::traits::Encoder;
use super::types::{Derivative, DerivativeFormat, EncodeJob};
use crate::atomic_write::write_atomic_blocking;

/// Encoder that decodes, resizes and re-encodes on a blocking thread.
#[derive(Debug, Default, Clone)]
pub struct ImageEncoder;

impl ImageEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Height that keeps the aspect ratio of `width` x `height` at `target_width`.
pub(crate) fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let scaled = (height as u64 * target_width as u64 + width as u64 / 2) / width as u64;
    scaled.clamp(1, u32::MAX as u64) as u32
}

fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ColorType::Rgb8.into(),
        )
        .map_err(|e| EncodeError::encode("jpeg", e.to_string()))?;
    Ok(buffer)
}

fn encode_webp(image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let memory = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height())
        .encode_simple(false, quality as f32)
        .map_err(|e| EncodeError::encode("webp", format!("{:?}", e)))?;
    Ok(memory.to_vec())
}

fn encode_blocking(job: &EncodeJob) -> Result<Vec<Derivative>, EncodeError> {
    // Originals are always named `.jpg`; the bytes decide the decoder.
    let original = ImageReader::open(&job.source)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| EncodeError::Decode {
            path: job.source.clone(),
            reason: e.to_string(),
        })?;
    let (original_width, original_height) = original.dimensions();

    let mut derivatives = Vec::with_capacity(job.plan.len());

    for width in job.plan.widths() {
        let height = scaled_height(original_width, original_height, width);
        let resized = original
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgb8();

        for spec in job.plan.specs().iter().filter(|s| s.width == width) {
            let bytes = match spec.format {
                DerivativeFormat::Jpeg => encode_jpeg(&resized, spec.quality)?,
                DerivativeFormat::WebP => encode_webp(&resized, spec.quality)?,
            };

            let path = job.output_dir.join(spec.file_name(&job.base_name));
            write_atomic_blocking(&path, &bytes)?;
            debug!("Wrote {} ({}x{}, {} bytes)", path.display(), width, height, bytes.len());

            derivatives.push(Derivative {
                path,
                width,
                height,
                format: spec.format,
                size_bytes: bytes.len() as u64,
            });
        }
    }

    Ok(derivatives)
}

fn ensure_input(path: &Path) -> Result<(), EncodeError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EncodeError::InputNotFound {
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl Encoder for ImageEncoder {
    fn name(&self) -> &str {
        "image"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<Vec<Derivative>, EncodeError> {
        ensure_input(&job.source)?;

        let job = job.clone();
        tokio::task::spawn_blocking(move || encode_blocking(&job))
            .await
            .map_err(|e| EncodeError::Task(e.to_string()))?
    }
}
