//! Encoder module for producing resized derivatives of an original image.
//!
//! Each original is decoded once, resized to every configured width
//! (aspect ratio preserved, upscaling allowed) and written in every
//! configured format as `{base}-{width}.{ext}`.
//!
//! # Example
//!
//! ```ignore
//! use stockpot_core::encoder::{DerivativePlan, EncodeJob, Encoder, ImageEncoder};
//!
//! let encoder = ImageEncoder::new();
//! let job = EncodeJob {
//!     source: PathBuf::from("assets/images/hero-orig.jpg"),
//!     output_dir: PathBuf::from("assets/images"),
//!     base_name: "hero".to_string(),
//!     plan: DerivativePlan::default(),
//! };
//!
//! let derivatives = encoder.encode(&job).await?;
//! assert_eq!(derivatives.len(), 6);
//! ```

mod error;
mod image_encoder;
mod traits;
mod types;

pub use error::EncodeError;
pub use image_encoder::ImageEncoder;
pub use traits::Encoder;
pub use types::{Derivative, DerivativeFormat, DerivativePlan, DerivativeSpec, EncodeJob};
