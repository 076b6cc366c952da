//! Instrumentation event model.
//!
//! # Responsibilities
//! - Define the "controller action completed" event the aggregator consumes
//! - Name the instrumentation channels the pipeline subscribes to (and the
//!   ones the framework's default loggers occupy)
//!
//! # Design Decisions
//! - One event type for both producers: the framework's instrumentation bus
//!   and the compat adapter populate the identical field set, so the
//!   aggregator is written once against this struct
//! - `path` is `Option`: resolution can fail inside the host and must not
//!   abort the log line; `None` renders as a literal "unknown"
//! - Optional runtimes are presence-gated, not zero-gated: `Some(0.0)` means
//!   the subsystem ran and took no measurable time

use http::{Method, StatusCode};
use serde_json::{Map, Value};

/// Channel carrying the completion event this pipeline aggregates.
pub const ACTION_COMPLETED: &str = "controller.action_completed";

/// Channel the framework's default request logger listens on.
pub const CONTROLLER_CHANNEL: &str = "controller";

/// Channel the framework's default view logger listens on.
pub const VIEW_CHANNEL: &str = "view";

/// Unhandled failure details attached to a completion event.
#[derive(Debug, Clone)]
pub struct RequestFailure {
    /// Exception class or error type name.
    pub exception: String,

    /// Human-readable error message.
    pub message: String,
}

/// A "controller action completed" instrumentation event.
///
/// Carries everything measured during one request: elapsed time, routing
/// outcome, response status, raw parameters, and the optional subsystem
/// runtimes.
#[derive(Debug, Clone)]
pub struct RequestEvent {
    /// Measured elapsed time for the whole action, in milliseconds.
    pub elapsed_ms: f64,

    /// HTTP method of the request.
    pub method: Method,

    /// Full request path; `None` when path resolution failed in the host.
    pub path: Option<String>,

    /// Negotiated response format (e.g. "html", "json"), if any.
    pub format: Option<String>,

    /// Controller that handled the request.
    pub controller: String,

    /// Action that was dispatched.
    pub action: String,

    /// Response status.
    pub status: StatusCode,

    /// Raw request parameters, before filtering.
    pub params: Map<String, Value>,

    /// View rendering time in milliseconds; present only if a view rendered.
    pub view_runtime: Option<f64>,

    /// Database time in milliseconds; present only if a connection was used.
    pub db_runtime: Option<f64>,

    /// Set when the request ended in an unhandled failure.
    pub failure: Option<RequestFailure>,
}

impl RequestEvent {
    /// Minimal event for a successful request. Callers fill in the optional
    /// fields they measured.
    pub fn new(method: Method, path: impl Into<String>, status: StatusCode) -> Self {
        Self {
            elapsed_ms: 0.0,
            method,
            path: Some(path.into()),
            format: None,
            controller: String::new(),
            action: String::new(),
            status,
            params: Map::new(),
            view_runtime: None,
            db_runtime: None,
            failure: None,
        }
    }
}
