//! Shared fixtures for extension tests.


pub(crate) use harness::{Harness, Pending, request};
pub(crate) use trees::{centred_parent, duplicate_hello, hello_column};

use std::ffi::OsString;
use std::sync::Arc;

use lookout_config::Config;
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::ConfigLoader;

/// Loader that parses a fixed command line through the layered loader.
pub(crate) struct ArgsConfigLoader(pub(crate) Vec<&'static str>);

impl ConfigLoader for ArgsConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter(self.0.iter().map(OsString::from))
    }
}

/// Loader that intentionally fails by passing an unparsable timeout.
pub(crate) struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("lookout"),
            OsString::from("--finder-timeout-ms"),
            OsString::from("soon"),
        ];
        Config::load_from_iter(args)
    }
}
