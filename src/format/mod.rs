//! Output format serialization.
//!
//! # Responsibilities
//! - Define the one-method contract every output format implements
//! - Map the configured format tag to its serializer strategy
//!
//! # Design Decisions
//! - Closed set of tagged variants behind one trait: the aggregator holds a
//!   `Box<dyn FormatSerializer>` and never inspects the tag
//! - Adding a format means one new variant + one new impl; no aggregator
//!   changes
//! - Serializers are pure: record in, string out, no I/O

pub mod line;
pub mod logstash;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::record::Record;

pub use line::LineFormat;
pub use logstash::LogstashFormat;

/// Strategy converting a finished [`Record`] into one output line.
pub trait FormatSerializer: Send + Sync {
    fn serialize(&self, record: &Record) -> String;
}

/// Rejected format tag. Fatal at setup, never at request time.
#[derive(Debug, thiserror::Error)]
#[error("unknown log_format {got:?} (expected one of: line, logstash)")]
pub struct UnknownFormat {
    pub got: String,
}

/// The configurable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Space-separated `key=value` tokens, one line per request.
    #[default]
    Line,

    /// Logstash-style JSON event with `@timestamp` and a message summary.
    Logstash,
}

impl LogFormat {
    /// Build the serializer for this format.
    pub fn serializer(&self) -> Box<dyn FormatSerializer> {
        match self {
            LogFormat::Line => Box::new(LineFormat),
            LogFormat::Logstash => Box::new(LogstashFormat),
        }
    }
}

impl FromStr for LogFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(LogFormat::Line),
            "logstash" => Ok(LogFormat::Logstash),
            other => Err(UnknownFormat {
                got: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Line => f.write_str("line"),
            LogFormat::Logstash => f.write_str("logstash"),
        }
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}
