//! Command dispatch for the driver extension.
//!
//! A request is a flat string map whose `command` field names its kind. The
//! dispatcher decodes it, looks up the handler registered for that kind, runs
//! it, and wraps the outcome in the response envelope:
//!
//! ```json
//! {"isError":false,"response":{"dx":350.0,"dy":250.0}}
//! {"isError":true,"response":"no matching element for text \"Hello\""}
//! ```
//!
//! ## Routing
//!
//! Built-in kinds decode into their typed [`lookout_protocol::Command`]
//! variant. Kinds registered through
//! [`DriverExtensionBuilder::extension`] arrive as `Command::Extension` with
//! their raw fields. A recognised kind without a handler is an unknown
//! command; an unrecognised kind is a malformed command.
//!
//! Every failure, including a handler panic, becomes an error envelope. The
//! extension keeps serving later commands.

mod context;
mod errors;
mod extension;
mod handlers;
mod registry;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

pub use self::context::DriverContext;
pub use self::errors::DispatchError;
pub use self::extension::{DriverExtension, DriverExtensionBuilder};
pub use self::registry::{CommandHandler, CommandRegistry};
