//! Compatibility adapter for hosts without a completion channel.
//!
//! # Responsibilities
//! - Produce the same "action completed" event an instrumented host would,
//!   by wrapping action dispatch and measuring elapsed time itself
//! - Drive the aggregator synchronously, since there is no bus to publish on
//!
//! # Design Decisions
//! - The aggregator is written once against [`RequestEvent`]; this adapter
//!   and the instrumentation channel are interchangeable producers selected
//!   at startup via [`FrameworkCapability`]
//! - Runtimes come from the action outcome: the adapter reports them only
//!   when the host measured them, preserving the presence-gating contract

use std::sync::Arc;
use std::time::Instant;

use http::{Method, StatusCode};
use serde_json::{Map, Value};

use crate::aggregator::EventAggregator;
use crate::event::{RequestEvent, RequestFailure};

/// What the host framework offers at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkCapability {
    /// The host publishes completion events on its instrumentation bus.
    Instrumented,

    /// No instrumentation channel; dispatch goes through [`LegacyDispatch`].
    Legacy,
}

/// Request-side facts known before the action runs.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub method: Method,

    /// `None` when the host failed to resolve the full path.
    pub path: Option<String>,

    pub controller: String,
    pub action: String,
    pub params: Map<String, Value>,
}

impl DispatchContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            method,
            path: Some(path.into()),
            controller: controller.into(),
            action: action.into(),
            params: Map::new(),
        }
    }
}

/// What the dispatched action produced.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub status: StatusCode,
    pub format: Option<String>,

    /// View rendering time, only if a view rendered.
    pub view_runtime: Option<f64>,

    /// Database time, only if a connection was used.
    pub db_runtime: Option<f64>,

    pub failure: Option<RequestFailure>,
}

impl ActionOutcome {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            format: None,
            view_runtime: None,
            db_runtime: None,
            failure: None,
        }
    }
}

/// Wraps action dispatch for legacy hosts, measures elapsed time, and feeds
/// the aggregator one event per dispatch.
pub struct LegacyDispatch {
    aggregator: Arc<EventAggregator>,
}

impl LegacyDispatch {
    pub fn new(aggregator: Arc<EventAggregator>) -> Self {
        Self { aggregator }
    }

    /// Run an action and log its completion. The outcome is handed back to
    /// the caller untouched; logging never alters the response.
    pub fn dispatch<F>(&self, context: DispatchContext, action: F) -> ActionOutcome
    where
        F: FnOnce() -> ActionOutcome,
    {
        let started = Instant::now();
        let outcome = action();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let event = RequestEvent {
            elapsed_ms,
            method: context.method,
            path: context.path,
            format: outcome.format.clone(),
            controller: context.controller,
            action: context.action,
            status: outcome.status,
            params: context.params,
            view_runtime: outcome.view_runtime,
            db_runtime: outcome.db_runtime,
            failure: outcome.failure.clone(),
        };
        self.aggregator.handle(&event);

        outcome
    }
}
