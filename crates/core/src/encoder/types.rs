//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::OptimizeConfig;

/// Output format of a derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeFormat {
    /// Lossy JPEG.
    Jpeg,
    /// Lossy WebP.
    WebP,
}

impl DerivativeFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

/// One (width, format) entry of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivativeSpec {
    pub width: u32,
    pub format: DerivativeFormat,
    /// Encoder quality, 1-100.
    pub quality: u8,
}

impl DerivativeSpec {
    /// `{base}-{width}.{ext}`
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}-{}.{}", base_name, self.width, self.format.extension())
    }
}

/// Ordered derivative matrix: every width, each in JPEG then WebP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivativePlan {
    specs: Vec<DerivativeSpec>,
}

impl DerivativePlan {
    /// Build the plan for `widths` at the given qualities.
    pub fn new(widths: &[u32], jpeg_quality: u8, webp_quality: u8) -> Self {
        let mut seen = Vec::with_capacity(widths.len());
        let mut specs = Vec::with_capacity(widths.len() * 2);

        for &width in widths {
            if seen.contains(&width) {
                continue;
            }
            seen.push(width);
            specs.push(DerivativeSpec {
                width,
                format: DerivativeFormat::Jpeg,
                quality: jpeg_quality,
            });
            specs.push(DerivativeSpec {
                width,
                format: DerivativeFormat::WebP,
                quality: webp_quality,
            });
        }

        Self { specs }
    }

    /// Build the plan from configuration.
    pub fn from_config(config: &OptimizeConfig) -> Self {
        Self::new(&config.widths, config.jpeg_quality, config.webp_quality)
    }

    pub fn specs(&self) -> &[DerivativeSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Distinct widths in plan order.
    pub fn widths(&self) -> Vec<u32> {
        let mut widths: Vec<u32> = Vec::new();
        for spec in &self.specs {
            if !widths.contains(&spec.width) {
                widths.push(spec.width);
            }
        }
        widths
    }
}

impl Default for DerivativePlan {
    fn default() -> Self {
        Self::from_config(&OptimizeConfig::default())
    }
}

/// A request to produce the derivatives of one original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Existing original image.
    pub source: PathBuf,
    /// Directory the derivatives are written to.
    pub output_dir: PathBuf,
    /// Base name for `{base}-{width}.{ext}`.
    pub base_name: String,
    pub plan: DerivativePlan,
}

/// A derivative written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: DerivativeFormat,
    pub size_bytes: u64,
}
