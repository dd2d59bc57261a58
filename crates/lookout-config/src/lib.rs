//! Layered configuration for the Lookout driver extension.
//!
//! Values are merged from built-in defaults, an optional configuration file,
//! `LOOKOUT_*` environment variables and command-line flags, in increasing
//! order of precedence.

mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_FINDER_TIMEOUT_MS, DEFAULT_LOG_FILTER, default_finder_timeout, default_frame_sync,
    default_log_filter, default_log_filter_string, default_log_format, default_skip_offstage,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved extension configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "LOOKOUT")]
pub struct Config {
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    log_filter: String,
    /// Output format for log events.
    #[ortho_config(default = default_log_format())]
    log_format: LogFormat,
    /// Polling timeout for finder commands that carry none, in milliseconds.
    #[ortho_config(default = DEFAULT_FINDER_TIMEOUT_MS)]
    finder_timeout_ms: u64,
    /// Whether finder commands wait for quiescence before resolving.
    /// Unset means [`default_frame_sync`].
    frame_sync: Option<bool>,
    /// Whether offstage elements are hidden from finders. Unset means
    /// [`default_skip_offstage`].
    skip_offstage: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            finder_timeout_ms: DEFAULT_FINDER_TIMEOUT_MS,
            frame_sync: None,
            skip_offstage: None,
        }
    }
}

impl Config {
    /// Returns the `tracing` filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the default polling timeout for finder commands.
    #[must_use]
    pub const fn finder_timeout(&self) -> Duration {
        Duration::from_millis(self.finder_timeout_ms)
    }

    /// Returns whether finder commands start out waiting for quiescence.
    #[must_use]
    pub const fn frame_sync(&self) -> bool {
        match self.frame_sync {
            Some(value) => value,
            None => default_frame_sync(),
        }
    }

    /// Returns whether offstage elements are hidden from finders.
    #[must_use]
    pub const fn skip_offstage(&self) -> bool {
        match self.skip_offstage {
            Some(value) => value,
            None => default_skip_offstage(),
        }
    }

    /// Sets the log filter expression.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Sets the default finder timeout.
    #[must_use]
    pub fn with_finder_timeout(mut self, timeout: Duration) -> Self {
        self.finder_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the initial frame-sync setting.
    #[must_use]
    pub const fn with_frame_sync(mut self, enabled: bool) -> Self {
        self.frame_sync = Some(enabled);
        self
    }

    /// Sets the offstage visibility policy.
    #[must_use]
    pub const fn with_skip_offstage(mut self, skip: bool) -> Self {
        self.skip_offstage = Some(skip);
        self
    }
}
