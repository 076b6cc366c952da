//! Log emission targets.
//!
//! # Responsibilities
//! - Define where finished lines go
//! - Guarantee each emission is a single non-interleaved write
//!
//! # Design Decisions
//! - One trait, small surface: the aggregator calls `write_line` once per
//!   request and nothing else
//! - `StdoutSink` takes the stdout lock for one `write_all`, so concurrent
//!   workers never interleave lines
//! - `MemorySink` captures lines for assertions; kept in the crate (not
//!   behind cfg(test)) so embedders can use it in their own suites

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for finished log lines.
pub trait LogSink: Send + Sync {
    /// Emit one complete line. Implementations must not interleave
    /// concurrent writes.
    fn write_line(&self, line: &str);
}

/// Writes each line straight to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        // A failed write to stdout has nowhere better to be reported
        let _ = handle.write_all(buf.as_bytes());
    }
}

/// Routes lines into the `tracing` ecosystem under a dedicated target, for
/// hosts that already ship a subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub const TARGET: &'static str = "onelog::request";
}

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "onelog::request", "{line}");
    }
}

/// Captures lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
