//! Event aggregation: the core of the pipeline.
//!
//! # Data Flow
//! ```text
//! "controller.action_completed" event
//!     → build record (duration, fixed fields, optional runtimes, params)
//!     → enrich (custom option provider; degrades on failure)
//!     → serialize (active format strategy)
//!     → sink.write_line (one atomic write per request)
//! ```
//!
//! # Design Decisions
//! - `handle` is total: no path through it returns an error or panics into
//!   the host's request handling; the worst outcome is a degraded record
//! - The aggregator holds its collaborators by contract (serializer trait,
//!   sink trait, provider enum) and is built once from the config object
//! - Optional fields are presence-gated: a request that rendered no view has
//!   no `view_runtime` key at all, rather than a zero

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::{LogConfig, ParamFilter};
use crate::enrich::{float_value, CustomOptions};
use crate::event::RequestEvent;
use crate::format::FormatSerializer;
use crate::record::Record;
use crate::sink::LogSink;
use crate::subscriber::Listener;

/// Framework-routing keys stripped from `params` on every request.
const ROUTING_PARAM_KEYS: &[&str] = &["controller", "action", "format", "_method"];

/// Marker rendered when the host could not resolve the request path.
const UNKNOWN_PATH: &str = "unknown";

/// Builds one [`Record`] per completion event and emits it through the sink.
pub struct EventAggregator {
    serializer: Box<dyn FormatSerializer>,
    custom_options: CustomOptions,
    param_filter: Option<ParamFilter>,
    sink: Arc<dyn LogSink>,
}

impl EventAggregator {
    /// Build the aggregator from the startup config. The serializer strategy
    /// is fixed here; nothing downstream inspects the format tag again.
    pub fn new(config: &LogConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            serializer: config.log_format.serializer(),
            custom_options: config.custom_options.clone(),
            param_filter: config.param_filter.clone(),
            sink,
        }
    }

    /// Aggregate one completion event into a single emitted line.
    pub fn handle(&self, event: &RequestEvent) {
        let mut record = self.build_record(event);
        self.enrich(&mut record, event);
        let line = self.serializer.serialize(&record);
        self.sink.write_line(&line);
    }

    fn build_record(&self, event: &RequestEvent) -> Record {
        let mut record = Record::new();
        record.set_duration(event.elapsed_ms);

        record.insert("method", event.method.as_str());
        record.insert("path", event.path.as_deref().unwrap_or(UNKNOWN_PATH));
        if let Some(format) = &event.format {
            record.insert("format", format.as_str());
        }
        if !event.controller.is_empty() {
            record.insert("controller", event.controller.as_str());
        }
        if !event.action.is_empty() {
            record.insert("action", event.action.as_str());
        }
        record.insert("status", event.status.as_u16());

        if let Some(view_runtime) = event.view_runtime {
            record.insert("view_runtime", float_value(view_runtime));
        }
        if let Some(db_runtime) = event.db_runtime {
            record.insert("db_runtime", float_value(db_runtime));
        }

        let params = self.filtered_params(&event.params);
        if !params.is_empty() {
            record.insert("params", Value::Object(params));
        }

        if let Some(failure) = &event.failure {
            record.insert("exception", failure.exception.as_str());
            record.insert("message", failure.message.as_str());
        }

        record
    }

    /// Run the params through the host's filter when one is configured, then
    /// strip the routing keys.
    fn filtered_params(&self, params: &Map<String, Value>) -> Map<String, Value> {
        let mut filtered = match &self.param_filter {
            Some(filter) => filter(params),
            None => params.clone(),
        };
        for key in ROUTING_PARAM_KEYS {
            filtered.remove(*key);
        }
        filtered
    }

    /// Merge custom fields. Canonical keys are never overwritten; a failing
    /// provider degrades the record to its canonical fields.
    fn enrich(&self, record: &mut Record, event: &RequestEvent) {
        match self.custom_options.resolve(event) {
            Ok(custom) => {
                for (key, value) in custom {
                    if !record.insert_custom(&key, value) {
                        tracing::debug!(key = %key, "custom option ignored; key already set");
                    }
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "custom option provider failed; emitting degraded record");
            }
        }
    }
}

impl Listener for EventAggregator {
    fn on_event(&self, event: &RequestEvent) {
        self.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RequestFailure;
    use crate::format::LogFormat;
    use crate::sink::MemorySink;
    use http::{Method, StatusCode};
    use serde_json::json;

    fn aggregator(config: LogConfig) -> (EventAggregator, MemorySink) {
        let sink = MemorySink::new();
        let aggregator = EventAggregator::new(&config, Arc::new(sink.clone()));
        (aggregator, sink)
    }

    fn show_user_event() -> RequestEvent {
        let mut event = RequestEvent::new(Method::GET, "/users/1", StatusCode::OK);
        event.elapsed_ms = 15.2;
        event.format = Some("html".into());
        event.controller = "UsersController".into();
        event.action = "show".into();
        event
    }

    #[test]
    fn test_full_line_for_instrumented_request() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.view_runtime = Some(2.1);
        event.db_runtime = Some(0.5);

        aggregator.handle(&event);

        assert_eq!(
            sink.lines(),
            vec![
                "method=GET path=/users/1 format=html controller=UsersController \
                 action=show status=200 duration=15.2 view=2.1 db=0.5"
            ]
        );
    }

    #[test]
    fn test_runtimes_omitted_when_subsystems_idle() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        aggregator.handle(&show_user_event());

        let line = &sink.lines()[0];
        assert!(!line.contains("view"));
        assert!(!line.contains("db"));
    }

    #[test]
    fn test_one_line_per_event() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        aggregator.handle(&show_user_event());
        aggregator.handle(&show_user_event());
        assert_eq!(sink.lines().len(), 2);
    }

    #[test]
    fn test_unresolved_path_degrades_to_marker() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.path = None;

        aggregator.handle(&event);
        assert!(sink.lines()[0].contains("path=unknown"));
    }

    #[test]
    fn test_zero_elapsed_clamps_duration() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.elapsed_ms = 0.0;

        aggregator.handle(&event);
        assert!(sink.lines()[0].contains("duration=0.01"));
    }

    #[test]
    fn test_routing_keys_stripped_from_params() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.params = json!({
            "controller": "users",
            "action": "show",
            "format": "html",
            "_method": "put",
            "id": "1"
        })
        .as_object()
        .unwrap()
        .clone();

        aggregator.handle(&event);
        let line = &sink.lines()[0];
        assert!(line.contains("params={\"id\":\"1\"}"));
    }

    #[test]
    fn test_params_omitted_when_only_routing_keys() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.params = json!({"controller": "users", "action": "show"})
            .as_object()
            .unwrap()
            .clone();

        aggregator.handle(&event);
        assert!(!sink.lines()[0].contains("params="));
    }

    #[test]
    fn test_host_param_filter_applied_before_stripping() {
        let config = LogConfig::default().with_param_filter(Arc::new(|params| {
            let mut filtered = params.clone();
            if filtered.contains_key("password") {
                filtered.insert("password".into(), json!("[FILTERED]"));
            }
            filtered
        }));
        let (aggregator, sink) = aggregator(config);

        let mut event = show_user_event();
        event.params = json!({"password": "hunter2", "action": "show"})
            .as_object()
            .unwrap()
            .clone();

        aggregator.handle(&event);
        let line = &sink.lines()[0];
        assert!(line.contains("[FILTERED]"));
        assert!(!line.contains("hunter2"));
    }

    #[test]
    fn test_custom_options_cannot_shadow_status() {
        let config = LogConfig::default().with_custom_options(CustomOptions::Static(
            json!({"status": "hacked", "app_version": "1.2.3"})
                .as_object()
                .unwrap()
                .clone(),
        ));
        let (aggregator, sink) = aggregator(config);

        aggregator.handle(&show_user_event());
        let line = &sink.lines()[0];
        assert!(line.contains("status=200"));
        assert!(!line.contains("hacked"));
        assert!(line.contains("app_version=1.2.3"));
    }

    #[test]
    fn test_custom_options_cannot_shadow_duration() {
        let config = LogConfig::default().with_custom_options(CustomOptions::Static(
            json!({"duration": "hacked"}).as_object().unwrap().clone(),
        ));
        let (aggregator, sink) = aggregator(config);

        aggregator.handle(&show_user_event());
        let line = &sink.lines()[0];
        let duration_tokens: Vec<&str> = line
            .split(' ')
            .filter(|token| token.starts_with("duration="))
            .collect();
        assert_eq!(duration_tokens, vec!["duration=15.2"]);
    }

    #[test]
    fn test_custom_options_cannot_shadow_duration_or_timestamp_in_logstash() {
        let config = LogConfig::new(LogFormat::Logstash).with_custom_options(
            CustomOptions::Static(
                json!({"duration": "hacked", "@timestamp": "1970-01-01T00:00:00Z"})
                    .as_object()
                    .unwrap()
                    .clone(),
            ),
        );
        let (aggregator, sink) = aggregator(config);

        aggregator.handle(&show_user_event());
        let event: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(event["duration"], json!(15.2));
        assert_ne!(event["@timestamp"], json!("1970-01-01T00:00:00Z"));
    }

    #[test]
    fn test_failing_provider_still_emits_canonical_line() {
        let config = LogConfig::default()
            .with_custom_options(CustomOptions::computed(|_| Err("boom".into())));
        let (aggregator, sink) = aggregator(config);

        aggregator.handle(&show_user_event());
        let line = &sink.lines()[0];
        assert!(line.contains("method=GET"));
        assert!(line.contains("path=/users/1"));
        assert!(line.contains("status=200"));
        assert!(line.contains("duration=15.2"));
    }

    #[test]
    fn test_failure_fields_populated_on_unhandled_error() {
        let (aggregator, sink) = aggregator(LogConfig::default());
        let mut event = show_user_event();
        event.status = StatusCode::INTERNAL_SERVER_ERROR;
        event.failure = Some(RequestFailure {
            exception: "RecordNotFound".into(),
            message: "could not find user 1".into(),
        });

        aggregator.handle(&event);
        let line = &sink.lines()[0];
        assert!(line.contains("status=500"));
        assert!(line.contains("exception=RecordNotFound"));
        assert!(line.contains("message=\"could not find user 1\""));
    }

    #[test]
    fn test_logstash_format_end_to_end() {
        let config = LogConfig::new(LogFormat::Logstash).with_custom_options(
            CustomOptions::Static(json!({"app_version": "1.2.3"}).as_object().unwrap().clone()),
        );
        let (aggregator, sink) = aggregator(config);

        aggregator.handle(&show_user_event());
        let event: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(event["message"], json!("GET /users/1 (200)"));
        assert_eq!(event["status"], json!(200));
        assert_eq!(event["duration"], json!(15.2));
        assert_eq!(event["app_version"], json!("1.2.3"));
        assert!(event["@timestamp"].is_string());
    }
}
