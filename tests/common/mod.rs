//! Shared builders for the integration suite.

use std::sync::Arc;

use http::{Method, StatusCode};
use onelog::{
    InProcessBus, Listener, ListenerOwner, ListenerRegistry, LogConfig, MemorySink, Pipeline,
    RequestEvent,
};

/// A pipeline wired to an in-process bus, with its captured output.
pub struct Harness {
    pub bus: InProcessBus,
    pub sink: MemorySink,
    pub pipeline: Pipeline,
}

/// Build a pipeline + bus + memory sink from a config.
pub fn harness(config: LogConfig) -> Harness {
    let sink = MemorySink::new();
    let pipeline = Pipeline::new(&config, Arc::new(sink.clone()));
    Harness {
        bus: InProcessBus::new(),
        sink,
        pipeline,
    }
}

/// A completed GET /users/1 with routing fields populated.
pub fn show_user_event() -> RequestEvent {
    let mut event = RequestEvent::new(Method::GET, "/users/1", StatusCode::OK);
    event.elapsed_ms = 15.2;
    event.format = Some("html".to_string());
    event.controller = "UsersController".to_string();
    event.action = "show".to_string();
    event
}

/// Stand-in for a framework's built-in logger: writes one noise line per
/// event it still receives.
pub struct NoisyLogger {
    pub output: MemorySink,
}

impl Listener for NoisyLogger {
    fn on_event(&self, _event: &RequestEvent) {
        use onelog::LogSink;
        self.output.write_line("framework default log line");
    }
}

/// Register framework default loggers on their channels, as a freshly booted
/// host would have them.
pub fn register_default_loggers(bus: &mut InProcessBus, output: &MemorySink) {
    bus.subscribe(
        onelog::event::CONTROLLER_CHANNEL,
        ListenerOwner::FrameworkRequestLogger,
        Arc::new(NoisyLogger {
            output: output.clone(),
        }),
    );
    bus.subscribe(
        onelog::event::VIEW_CHANNEL,
        ListenerOwner::FrameworkViewLogger,
        Arc::new(NoisyLogger {
            output: output.clone(),
        }),
    );
    bus.subscribe(
        onelog::ACTION_COMPLETED,
        ListenerOwner::FrameworkRequestLogger,
        Arc::new(NoisyLogger {
            output: output.clone(),
        }),
    );
}

/// Split a `key=value` line into (key, value) pairs, respecting quoting.
pub fn parse_line(line: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let eq = rest.find('=').expect("token without '='");
        let key = rest[..eq].to_string();
        rest = &rest[eq + 1..];
        let value;
        if let Some(stripped) = rest.strip_prefix('"') {
            let close = stripped.find('"').expect("unterminated quote");
            value = stripped[..close].to_string();
            rest = stripped[close + 1..].trim_start();
        } else {
            match rest.find(' ') {
                Some(space) => {
                    value = rest[..space].to_string();
                    rest = &rest[space + 1..];
                }
                None => {
                    value = rest.to_string();
                    rest = "";
                }
            }
        }
        pairs.push((key, value));
    }
    pairs
}
