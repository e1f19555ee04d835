//! Trait definitions for the encoder module.

use async_trait::async_trait;

use super::error::EncodeError;
use super::types::{Derivative, EncodeJob};

/// Produces the derivative set for one original.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Writes every derivative in `job.plan`, in plan order.
    async fn encode(&self, job: &EncodeJob) -> Result<Vec<Derivative>, EncodeError>;
}
