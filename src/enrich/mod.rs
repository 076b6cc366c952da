//! Custom option enrichment.
//!
//! # Responsibilities
//! - Hold the process-wide source of extra log fields
//! - Resolve that source against the raw event for each request
//!
//! # Design Decisions
//! - Tagged enum instead of duck-typed dispatch: `None` / `Static` /
//!   `Computed` are the three configurable shapes
//! - A computed provider is fallible; `Err` degrades the record and is never
//!   allowed to abort request handling. Panicking inside a provider is out
//!   of contract.
//! - Resolution must not mutate shared state; the provider only reads the
//!   event it is handed

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::event::RequestEvent;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed computed-provider closure.
pub type Provider =
    Arc<dyn Fn(&RequestEvent) -> Result<Map<String, Value>, BoxError> + Send + Sync>;

/// Process-wide source of custom log fields, configured once at setup.
#[derive(Clone, Default)]
pub enum CustomOptions {
    /// No enrichment; resolves to an empty map.
    #[default]
    None,

    /// Same fields appended to every record.
    Static(Map<String, Value>),

    /// Fields computed from the raw event.
    Computed(Provider),
}

impl CustomOptions {
    /// Build a computed provider from a closure.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RequestEvent) -> Result<Map<String, Value>, BoxError> + Send + Sync + 'static,
    {
        CustomOptions::Computed(Arc::new(f))
    }

    /// Resolve the configured source against one event.
    pub fn resolve(&self, event: &RequestEvent) -> Result<Map<String, Value>, BoxError> {
        match self {
            CustomOptions::None => Ok(Map::new()),
            CustomOptions::Static(map) => Ok(map.clone()),
            CustomOptions::Computed(provider) => provider(event),
        }
    }
}

impl fmt::Debug for CustomOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomOptions::None => f.write_str("CustomOptions::None"),
            CustomOptions::Static(map) => f.debug_tuple("CustomOptions::Static").field(map).finish(),
            CustomOptions::Computed(_) => f.write_str("CustomOptions::Computed(..)"),
        }
    }
}

/// Encode a float for the payload. Non-finite values have no JSON encoding;
/// they coerce to their string rendering instead of dropping the field.
pub fn float_value(value: f64) -> Value {
    match serde_json::Number::from_f64(value) {
        Some(n) => Value::Number(n),
        None => Value::String(value.to_string()),
    }
}
