//! Single-line structured request logging.
//!
//! Collapses the instrumentation signals a web framework emits during one
//! request (routing, action, view rendering, database access) into exactly
//! one structured log line, replacing the framework's multi-line default
//! output.
//!
//! # Architecture Overview
//!
//! ```text
//!   instrumented host                      legacy host
//!   ─────────────────                      ───────────
//!   bus.publish("controller.              adapter.dispatch(context, action)
//!       action_completed", event)                 │
//!           │                                     │  (measures elapsed time,
//!           ▼                                     │   builds the same event)
//!   ┌───────────────────┐                         │
//!   │  event aggregator │◀────────────────────────┘
//!   └─────────┬─────────┘
//!             │ builds per-request Record, merges custom options
//!             ▼
//!   ┌───────────────────┐     ┌──────────────────────┐
//!   │      Record       │────▶│  format serializer   │──▶ log sink
//!   └───────────────────┘     │  (line | logstash)   │    (one line)
//!                             └──────────────────────┘
//!
//!   startup: the subscriber registry removes the framework's default
//!   request/view log listeners, then installs the aggregator as the sole
//!   consumer of the completion channel.
//! ```
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use http::{Method, StatusCode};
//! use onelog::{
//!     InProcessBus, LogConfig, MemorySink, Pipeline, RequestEvent, ACTION_COMPLETED,
//! };
//!
//! let sink = MemorySink::new();
//! let pipeline = Pipeline::new(&LogConfig::default(), Arc::new(sink.clone()));
//!
//! let mut bus = InProcessBus::new();
//! pipeline.install(&mut bus);
//!
//! let mut event = RequestEvent::new(Method::GET, "/users/1", StatusCode::OK);
//! event.elapsed_ms = 15.2;
//! bus.publish(ACTION_COMPLETED, &event);
//!
//! assert_eq!(sink.lines().len(), 1);
//! ```

// Core pipeline
pub mod aggregator;
pub mod event;
pub mod format;
pub mod record;

// Event sources
pub mod compat;
pub mod subscriber;

// Cross-cutting concerns
pub mod config;
pub mod enrich;
pub mod pipeline;
pub mod sink;

pub use aggregator::EventAggregator;
pub use compat::{ActionOutcome, DispatchContext, FrameworkCapability, LegacyDispatch};
pub use config::{load_config, parse_config, ConfigError, LogConfig, ParamFilter};
pub use enrich::CustomOptions;
pub use event::{RequestEvent, RequestFailure, ACTION_COMPLETED};
pub use format::{FormatSerializer, LogFormat};
pub use pipeline::Pipeline;
pub use record::Record;
pub use sink::{LogSink, MemorySink, StdoutSink, TracingSink};
pub use subscriber::{InProcessBus, Listener, ListenerOwner, ListenerRegistry};
