//! Layered configuration for the `remock` tool.
//!
//! Values resolve from built-in defaults, then a TOML file
//! (`--config-path` or `REMOCK_CONFIG_PATH`), then `REMOCK_*` environment
//! variables, then command-line flags. Later layers win.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_EXTENSIONS, DEFAULT_LOG_FILTER, default_extensions, default_log_filter,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved configuration for a `remock` run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REMOCK")]
pub struct Config {
    /// `tracing` filter expression, e.g. `remock_syntax=debug`.
    pub log_filter: Option<String>,
    /// Log output format.
    pub log_format: Option<LogFormat>,
    /// Comma-separated file extensions to rewrite, e.g. `rb,rake`.
    pub extensions: Option<String>,
}

impl Config {
    /// Returns the configured log filter or the default.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Returns the configured log format or the default.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }

    /// Returns the candidate file extensions, lower-cased, without leading
    /// dots and with empty entries dropped.
    #[must_use]
    pub fn extensions(&self) -> Vec<String> {
        let raw = self.extensions.as_deref().unwrap_or(DEFAULT_EXTENSIONS);
        raw.split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}
