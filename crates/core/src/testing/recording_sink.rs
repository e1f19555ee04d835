//! Event sink that keeps every event for assertions.

use std::sync::{Arc, Mutex};

use crate::events::{EventSink, PipelineEvent};

/// Captures emitted events in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events of one type (see [`PipelineEvent::event_type`]).
    pub fn events_of_type(&self, event_type: &str) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Events belonging to one descriptor.
    pub fn events_for(&self, filename: &str) -> Vec<PipelineEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.descriptor() == Some(filename))
            .collect()
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.events_of_type(event_type).len()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PipelineEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
