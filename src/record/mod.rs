//! The per-request log record.
//!
//! # Responsibilities
//! - Accumulate payload fields written by the aggregator during one request
//! - Hold the measured duration, clamped and rounded once
//! - Define the ordered field sequence the serializers render
//!
//! # Design Decisions
//! - Payload is an insertion-ordered map (`serde_json` with `preserve_order`)
//!   so emitted lines keep a stable field order across requests
//! - `duration` lives outside the payload and is spliced into the field
//!   sequence after `status`; serializers iterate `fields()` and never
//!   reorder
//! - A record belongs to a single request's call frame. It is never shared
//!   and needs no locking; it is dropped right after emission.

use serde_json::{Map, Value};

/// Floor for the recorded duration, in milliseconds. A request never reports
/// an elapsed time of zero.
pub const MIN_DURATION_MS: f64 = 0.01;

/// Payload keys owned by the pipeline. Custom options must not overwrite
/// these. `duration` and `@timestamp` live outside the payload but are
/// rendered by the serializers, so they are reserved here as well.
pub const CANONICAL_FIELDS: &[&str] = &[
    "method",
    "path",
    "format",
    "controller",
    "action",
    "status",
    "duration",
    "view_runtime",
    "db_runtime",
    "params",
    "exception",
    "message",
    "@timestamp",
];

/// Accumulator for one request's log fields.
#[derive(Debug, Clone, Default)]
pub struct Record {
    duration: f64,
    payload: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the measured duration, clamping to [`MIN_DURATION_MS`] and
    /// rounding to two decimal places.
    pub fn set_duration(&mut self, elapsed_ms: f64) {
        let clamped = elapsed_ms.max(MIN_DURATION_MS);
        self.duration = (clamped * 100.0).round() / 100.0;
    }

    /// Duration in milliseconds, always >= [`MIN_DURATION_MS`] once set.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Insert a payload field. Later inserts for the same key overwrite.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.payload.insert(key.into(), value.into());
    }

    /// Insert a custom field, refusing to overwrite canonical keys or any
    /// key already present. Returns whether the value was stored.
    pub fn insert_custom(&mut self, key: &str, value: Value) -> bool {
        if CANONICAL_FIELDS.contains(&key) || self.payload.contains_key(key) {
            return false;
        }
        self.payload.insert(key.to_string(), value);
        true
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// The ordered field sequence serializers render: payload entries in
    /// insertion order, with `duration` spliced in right after `status`
    /// (appended last when `status` is absent).
    pub fn fields(&self) -> Vec<(&str, Value)> {
        let mut out = Vec::with_capacity(self.payload.len() + 1);
        let duration = ("duration", Value::from(self.duration));
        let mut placed = false;
        for (key, value) in &self.payload {
            out.push((key.as_str(), value.clone()));
            if key == "status" {
                out.push(duration.clone());
                placed = true;
            }
        }
        if !placed {
            out.push(duration);
        }
        out
    }
}
