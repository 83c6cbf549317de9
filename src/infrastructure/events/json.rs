//! JSON Event Sink
//!
//! Outputs resolver events as NDJSON for CI/automation consumption.
//! Each line is `{"event", "source", "timestamp", ...payload}`.

use crate::domain::ports::{EventSink, ResolverEvent};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn envelope(event: &ResolverEvent, source: &str) -> Value {
    let mut line = Map::new();
    line.insert("event".to_string(), Value::from(event.name()));
    line.insert("source".to_string(), Value::from(source));
    line.insert(
        "timestamp".to_string(),
        Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    if let Value::Object(payload) = event.payload() {
        for (key, value) in payload {
            line.entry(key).or_insert(value);
        }
    }
    Value::Object(line)
}

impl EventSink for JsonEventSink {
    fn publish(&self, event: &ResolverEvent, source: &str) {
        self.write_event(envelope(event, source));
    }
}
