//! Extension bootstrap orchestration.
//!
//! Loads layered configuration, installs telemetry, and builds the
//! [`DriverExtension`] from the host's collaborators.

use std::rc::Rc;
use std::sync::Arc;

use lookout_config::Config;
use lookout_tree::TreeSource;
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::info;

use crate::data::DataHandler;
use crate::dispatch::DriverExtension;
use crate::sync::SchedulerSignals;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

const BOOTSTRAP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bootstrap");

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader {
    /// Loads the extension configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a fixed configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticConfigLoader(pub Config);

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.0.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
}

/// Host collaborators the extension observes.
pub struct DriverParts {
    /// Source of live tree snapshots.
    pub tree: Rc<dyn TreeSource>,
    /// Read access to the host scheduler.
    pub signals: Rc<dyn SchedulerSignals>,
    /// Optional `RequestData` handler.
    pub data_handler: Option<Rc<dyn DataHandler>>,
}

/// Result of a successful bootstrap invocation.
pub struct Driver {
    config: Config,
    telemetry: TelemetryHandle,
    extension: DriverExtension,
}

impl Driver {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> &TelemetryHandle {
        &self.telemetry
    }

    /// Accessor for the configured extension.
    #[must_use]
    pub const fn extension(&self) -> &DriverExtension {
        &self.extension
    }

    /// Consumes the driver, returning the extension.
    #[must_use]
    pub fn into_extension(self) -> DriverExtension {
        self.extension
    }
}

/// Bootstraps the extension from the system configuration sources.
///
/// # Errors
///
/// See [`bootstrap_with`].
pub fn bootstrap(parts: DriverParts) -> Result<Driver, BootstrapError> {
    bootstrap_with(&SystemConfigLoader, parts)
}

/// Bootstraps the extension using the supplied configuration loader.
///
/// # Errors
///
/// Returns [`BootstrapError::Configuration`] if configuration cannot be
/// loaded and [`BootstrapError::Telemetry`] if the subscriber cannot be
/// installed.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    parts: DriverParts,
) -> Result<Driver, BootstrapError> {
    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => return Err(BootstrapError::Configuration { source }),
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => return Err(BootstrapError::Telemetry { source }),
    };

    let DriverParts {
        tree,
        signals,
        data_handler,
    } = parts;
    let mut builder = DriverExtension::builder(tree, signals).with_config(&config);
    if let Some(handler) = data_handler {
        builder = builder.data_handler(handler);
    }
    let extension = builder.build();

    info!(
        target: BOOTSTRAP_TARGET,
        frame_sync = config.frame_sync(),
        finder_timeout = ?config.finder_timeout(),
        commands = extension.registry().kinds().count(),
        "driver extension ready"
    );
    Ok(Driver {
        config,
        telemetry,
        extension,
    })
}
