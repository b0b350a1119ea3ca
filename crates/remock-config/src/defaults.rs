//! Built-in configuration defaults.

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default comma-separated list of candidate file extensions.
pub const DEFAULT_EXTENSIONS: &str = "rb";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default candidate file extensions.
#[must_use]
pub const fn default_extensions() -> &'static str {
    DEFAULT_EXTENSIONS
}
