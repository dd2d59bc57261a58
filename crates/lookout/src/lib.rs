//! In-process driver extension for UI automation.
//!
//! Lookout lets an external test driver control and inspect a running
//! application. The host embeds a [`DriverExtension`], feeds it every command
//! the transport delivers, and reports each scheduler tick through
//! [`DriverExtension::on_tick`]. In return the extension locates elements in
//! the live tree, reads their geometry, text and semantics, dumps diagnostics
//! trees, and holds commands back until animations settle.
//!
//! All work happens on the host's UI thread. Commands are futures that make
//! progress only when the host polls them, and they suspend only between
//! scheduler ticks.
//!
//! ```ignore
//! let extension = DriverExtension::builder(tree, signals)
//!     .with_config(&config)
//!     .build();
//!
//! // Transport callback:
//! let response = extension.dispatch(&request_bytes).await;
//!
//! // Scheduler callback, once per frame:
//! extension.on_tick(frame_timestamp);
//! ```

pub mod bootstrap;
mod data;
pub mod dispatch;
pub mod sync;
pub mod telemetry;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Driver, DriverParts, StaticConfigLoader, SystemConfigLoader,
    bootstrap, bootstrap_with,
};
pub use data::{DataHandler, DataHandlerError};
pub use dispatch::{
    CommandHandler, CommandRegistry, DispatchError, DriverContext, DriverExtension,
    DriverExtensionBuilder,
};
pub use sync::{
    FrameSignals, Quiescence, SchedulerSignals, SyncStatus, Synchronizer, WaitTimedOut,
};

#[cfg(test)]
mod tests;
