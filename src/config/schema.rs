//! Configuration schema.
//!
//! The config object is built once at startup and passed by reference into
//! the pipeline; nothing reads configuration at request time.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::enrich::CustomOptions;
use crate::format::LogFormat;

/// The host's parameter-filtering capability (e.g. redaction of sensitive
/// keys). Absent means parameters pass through unfiltered.
pub type ParamFilter = Arc<dyn Fn(&Map<String, Value>) -> Map<String, Value> + Send + Sync>;

/// Pipeline configuration. Read once at setup, immutable afterwards.
#[derive(Clone, Default)]
pub struct LogConfig {
    /// Active output format.
    pub log_format: LogFormat,

    /// Source of extra fields appended to every record.
    pub custom_options: CustomOptions,

    /// Host-supplied parameter filter, if any.
    pub param_filter: Option<ParamFilter>,
}

impl LogConfig {
    pub fn new(log_format: LogFormat) -> Self {
        Self {
            log_format,
            custom_options: CustomOptions::None,
            param_filter: None,
        }
    }

    pub fn with_custom_options(mut self, custom_options: CustomOptions) -> Self {
        self.custom_options = custom_options;
        self
    }

    pub fn with_param_filter(mut self, filter: ParamFilter) -> Self {
        self.param_filter = Some(filter);
        self
    }
}

impl std::fmt::Debug for LogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogConfig")
            .field("log_format", &self.log_format)
            .field("custom_options", &self.custom_options)
            .field("param_filter", &self.param_filter.as_ref().map(|_| ".."))
            .finish()
    }
}

/// On-disk shape of the config file. Only the declarative subset is
/// expressible here; computed providers and param filters are wired in code.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfigFile {
    /// Output format tag: "line" or "logstash".
    pub log_format: LogFormat,

    /// Static fields appended to every record.
    pub custom_options: Option<Map<String, Value>>,
}

impl From<LogConfigFile> for LogConfig {
    fn from(file: LogConfigFile) -> Self {
        let custom_options = match file.custom_options {
            Some(map) if !map.is_empty() => CustomOptions::Static(map),
            _ => CustomOptions::None,
        };
        LogConfig::new(file.log_format).with_custom_options(custom_options)
    }
}
