//! Tracing Event Sink
//!
//! Mirrors every event into the log at `info`.

use crate::domain::ports::{EventSink, ResolverEvent};

pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: &ResolverEvent, source: &str) {
        tracing::info!(
            event = event.name(),
            source,
            payload = %event.payload(),
            "resolver event"
        );
    }
}
