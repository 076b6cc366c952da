//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{LogConfig, LogConfigFile};
use crate::format::UnknownFormat;

/// Error type for configuration loading. Every variant is fatal at setup;
/// none can occur at request time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Format(#[from] UnknownFormat),
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<LogConfig, ConfigError> {
    let file: LogConfigFile = toml::from_str(content)?;
    Ok(file.into())
}
