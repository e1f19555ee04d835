//! Batch driver: processes every descriptor in order, isolating failures.

mod driver;
mod types;

pub use driver::{BatchDriver, BatchError, BatchSettings, ProcessError};
pub use types::*;
