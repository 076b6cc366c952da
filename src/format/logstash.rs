//! Logstash-style JSON event format.
//!
//! One JSON object per line: `@timestamp` (RFC 3339, UTC), a `message`
//! summary, then every record field as a top-level key:
//!
//! ```text
//! {"@timestamp":"2026-08-27T12:00:00+00:00","message":"GET /users/1 (200)","method":"GET",...,"duration":15.2}
//! ```

use chrono::Utc;
use serde_json::{Map, Value};

use crate::format::FormatSerializer;
use crate::record::Record;

pub struct LogstashFormat;

impl LogstashFormat {
    fn summary(record: &Record) -> String {
        let payload = record.payload();
        let text = |key: &str| -> String {
            match payload.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "-".to_string(),
            }
        };
        format!("{} {} ({})", text("method"), text("path"), text("status"))
    }
}

impl FormatSerializer for LogstashFormat {
    fn serialize(&self, record: &Record) -> String {
        let mut event = Map::new();
        event.insert(
            "@timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        event.insert("message".to_string(), Value::String(Self::summary(record)));
        for (key, value) in record.fields() {
            event.insert(key.to_string(), value);
        }
        // Display on Value is infallible; no per-request error path here
        Value::Object(event).to_string()
    }
}
