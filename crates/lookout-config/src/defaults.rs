use std::time::Duration;

use crate::logging::LogFormat;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default polling timeout, in milliseconds, for finder commands that carry
/// none. `0` means a single resolution attempt.
pub const DEFAULT_FINDER_TIMEOUT_MS: u64 = 0;

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default polling timeout for finder commands.
#[must_use]
pub const fn default_finder_timeout() -> Duration {
    Duration::from_millis(DEFAULT_FINDER_TIMEOUT_MS)
}

/// Whether finder commands wait for quiescence by default.
#[must_use]
pub const fn default_frame_sync() -> bool {
    true
}

/// Whether offstage elements are hidden from finders by default.
#[must_use]
pub const fn default_skip_offstage() -> bool {
    true
}
