//! Structured telemetry for the extension.
//!
//! The host application usually owns logging already, so installing a
//! subscriber here is optional. Command spans are emitted either way and
//! join whatever subscriber is active.

use std::io::{self, IsTerminal};

use lookout_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Span, Subscriber, debug_span, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::dispatch::DISPATCH_TARGET;

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Settings of the subscriber this crate installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
    filter: String,
}

impl TelemetryHandle {
    /// Output format of the installed subscriber.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }

    /// Filter expression of the installed subscriber.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber is already installed, typically the host's.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber described by `config` on first use.
///
/// Later calls return the handle of the first installation, even when
/// `config` asks for different settings. Hosts that install their own
/// subscriber should skip this; installing over one fails with
/// [`TelemetryError::Subscriber`].
///
/// # Examples
///
/// ```rust
/// use lookout::telemetry;
/// use lookout_config::Config;
///
/// # fn main() -> Result<(), lookout::telemetry::TelemetryError> {
/// let first = telemetry::initialise(&Config::default())?;
/// let again = telemetry::initialise(&Config::default().with_log_filter("debug"))?;
/// assert_eq!(first, again);
/// # Ok(())
/// # }
/// ```
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install_subscriber(config))
        .cloned()
}

/// Returns the handle of the subscriber installed by [`initialise`], if any.
#[must_use]
pub fn installed() -> Option<&'static TelemetryHandle> {
    INSTALLED.get()
}

/// Span wrapping the execution of one command.
pub(crate) fn command_span(kind: &str, frame_sync: bool) -> Span {
    debug_span!(target: DISPATCH_TARGET, "lookout.command", kind, frame_sync)
}

fn subscriber_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter(error.to_string()))
}

fn install_subscriber(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let filter = subscriber_filter(config)?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(
            builder(filter)
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .finish(),
        ),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)?;
    Ok(TelemetryHandle {
        format: config.log_format(),
        filter: config.log_filter().to_owned(),
    })
}
