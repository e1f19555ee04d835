//! Pipeline events and the sinks that receive them.
//!
//! Every skip, attempt, fallback, failure and success in a run is emitted as a
//! [`PipelineEvent`]. The binary routes them to `tracing` through
//! [`TracingSink`]; tests capture them with `testing::RecordingSink`.

mod sink;
mod types;

pub use sink::{EventSink, TracingSink};
pub use types::PipelineEvent;
