use tracing::Level;

use super::PipelineEvent;

/// Receiver for pipeline events.
///
/// Emission is fire-and-forget: a sink must not fail the caller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

/// Sink that writes every event through `tracing`.
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn emit(&self, event: PipelineEvent) {
        let descriptor = event.descriptor().unwrap_or("-");
        let event_type = event.event_type();

        let level = event.level();
        if level == Level::ERROR {
            tracing::error!(descriptor, event_type, "{}", event);
        } else if level == Level::WARN {
            tracing::warn!(descriptor, event_type, "{}", event);
        } else if level == Level::DEBUG {
            tracing::debug!(descriptor, event_type, "{}", event);
        } else {
            tracing::info!(descriptor, event_type, "{}", event);
        }
    }
}
