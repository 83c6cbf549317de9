//! Event Sink Implementations
//!
//! Provides concrete implementations of EventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - TracingEventSink: events mirrored into the log

mod json;
mod log;

pub use json::JsonEventSink;
pub use log::TracingEventSink;
