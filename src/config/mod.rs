//! Configuration management.
//!
//! # Design Decisions
//! - Explicit config object constructed once at startup and handed to the
//!   pipeline by reference; no ambient global lookup at request time
//! - Unknown format tags fail at load, before any request is handled
//! - The file surface covers the declarative subset (format tag, static
//!   custom fields); computed providers and param filters are code-level

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{LogConfig, LogConfigFile, ParamFilter};
