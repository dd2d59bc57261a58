//! The driver extension: configuration, routing and the response envelope.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use lookout_config::Config;
use lookout_protocol::{
    Command, CommandKind, DecodeError, DriverResponse, RawCommand, ResponsePayload, parse_raw,
};
use lookout_tree::{ResolvePolicy, TreeSource};
use tracing::{Instrument, debug, warn};

use super::DISPATCH_TARGET;
use super::context::DriverContext;
use super::errors::DispatchError;
use super::handlers::register_builtins;
use super::registry::{CommandHandler, CommandRegistry};
use crate::data::DataHandler;
use crate::sync::{SchedulerSignals, Synchronizer};
use crate::telemetry;

/// Configures and builds a [`DriverExtension`].
pub struct DriverExtensionBuilder {
    tree: Rc<dyn TreeSource>,
    signals: Rc<dyn SchedulerSignals>,
    data_handler: Option<Rc<dyn DataHandler>>,
    extensions: Vec<(String, Rc<dyn CommandHandler>)>,
    frame_sync: bool,
    finder_timeout: Duration,
    policy: ResolvePolicy,
}

impl DriverExtensionBuilder {
    fn new(tree: Rc<dyn TreeSource>, signals: Rc<dyn SchedulerSignals>) -> Self {
        let defaults = Config::default();
        Self {
            tree,
            signals,
            data_handler: None,
            extensions: Vec::new(),
            frame_sync: defaults.frame_sync(),
            finder_timeout: defaults.finder_timeout(),
            policy: ResolvePolicy {
                skip_offstage: defaults.skip_offstage(),
            },
        }
    }

    /// Applies the dispatch settings from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.frame_sync = config.frame_sync();
        self.finder_timeout = config.finder_timeout();
        self.policy.skip_offstage = config.skip_offstage();
        self
    }

    /// Registers the application's `RequestData` handler.
    #[must_use]
    pub fn data_handler(mut self, handler: Rc<dyn DataHandler>) -> Self {
        self.data_handler = Some(handler);
        self
    }

    /// Registers a handler for an extension command kind.
    ///
    /// Registering a built-in kind replaces the built-in handler.
    #[must_use]
    pub fn extension(mut self, kind: impl Into<String>, handler: Rc<dyn CommandHandler>) -> Self {
        self.extensions.push((kind.into(), handler));
        self
    }

    /// Sets whether finder commands wait for an idle frame first.
    #[must_use]
    pub const fn frame_sync(mut self, enabled: bool) -> Self {
        self.frame_sync = enabled;
        self
    }

    /// Sets the polling window used when a command names no timeout.
    #[must_use]
    pub const fn finder_timeout(mut self, timeout: Duration) -> Self {
        self.finder_timeout = timeout;
        self
    }

    /// Sets the visibility rules for resolution.
    #[must_use]
    pub const fn resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the extension.
    pub fn build(self) -> DriverExtension {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry, self.data_handler.is_some());
        for (kind, handler) in self.extensions {
            if registry.register(kind.as_str(), handler).is_some() {
                debug!(target: DISPATCH_TARGET, %kind, "built-in handler replaced");
            }
        }
        let sync = Synchronizer::new(self.signals);
        let context = DriverContext::new(
            self.tree,
            sync,
            self.frame_sync,
            self.finder_timeout,
            self.policy,
            self.data_handler,
        );
        DriverExtension { registry, context }
    }
}

/// The in-process endpoint that executes driver commands.
///
/// Commands may run concurrently as separate futures on the host's
/// executor; each one observes its own tree snapshots.
pub struct DriverExtension {
    registry: CommandRegistry,
    context: DriverContext,
}

impl DriverExtension {
    /// Starts building an extension over `tree`, reading the scheduler
    /// through `signals`.
    pub fn builder(
        tree: Rc<dyn TreeSource>,
        signals: Rc<dyn SchedulerSignals>,
    ) -> DriverExtensionBuilder {
        DriverExtensionBuilder::new(tree, signals)
    }

    /// Parses request bytes, executes the command and returns the encoded
    /// response envelope.
    pub async fn dispatch(&self, request: &[u8]) -> Vec<u8> {
        let response = match parse_raw(request) {
            Ok(raw) => self.call(raw).await,
            Err(error) => {
                let error = DispatchError::from(error);
                warn!(target: DISPATCH_TARGET, %error, "rejected request");
                DriverResponse::failure(error.to_string())
            }
        };
        response.encode()
    }

    /// Executes one raw command and returns its response.
    pub async fn call(&self, raw: RawCommand) -> DriverResponse {
        let kind = Command::kind_of(&raw).map(str::to_owned);
        let outcome = match kind {
            Ok(name) => self.execute(&name, raw).await,
            Err(error) => Err(DispatchError::from(error)),
        };
        match outcome {
            Ok(payload) => DriverResponse::success(payload),
            Err(error) => DriverResponse::failure(error.to_string()),
        }
    }

    async fn execute(&self, kind: &str, raw: RawCommand) -> Result<ResponsePayload, DispatchError> {
        let (command, handler) = self.route(kind, raw).inspect_err(|error| {
            warn!(target: DISPATCH_TARGET, kind, %error, "rejected command");
        })?;

        debug!(target: DISPATCH_TARGET, kind, "dispatching command");
        let span = telemetry::command_span(kind, self.context.frame_sync());
        let outcome = AssertUnwindSafe(handler.handle(command, &self.context))
            .catch_unwind()
            .instrument(span)
            .await
            .unwrap_or_else(|panic| {
                Err(DispatchError::handler_fault(kind, panic_message(&*panic)))
            });

        match &outcome {
            Ok(_) => debug!(target: DISPATCH_TARGET, kind, "command succeeded"),
            Err(error @ DispatchError::HandlerFault { .. }) => {
                warn!(target: DISPATCH_TARGET, kind, %error, "handler panicked");
            }
            Err(error) => debug!(target: DISPATCH_TARGET, kind, %error, "command failed"),
        }
        outcome
    }

    /// Decodes `raw` and finds the handler for it.
    fn route(
        &self,
        kind: &str,
        raw: RawCommand,
    ) -> Result<(Command, Rc<dyn CommandHandler>), DispatchError> {
        let handler = self.registry.get(kind);
        match CommandKind::parse(kind) {
            Some(builtin) => {
                let command = Command::decode_kind(builtin, &raw)?;
                let handler = handler.ok_or_else(|| DispatchError::unknown_command(kind))?;
                Ok((command, handler))
            }
            None => {
                let handler =
                    handler.ok_or_else(|| DispatchError::from(DecodeError::unknown_kind(kind)))?;
                Ok((Command::extension(kind, raw), handler))
            }
        }
    }

    /// Reports a completed scheduler tick at `timestamp` on the host clock.
    pub fn on_tick(&self, timestamp: Duration) {
        self.context.synchronizer().on_tick(timestamp);
    }

    /// Returns the quiescence synchronizer.
    pub const fn synchronizer(&self) -> &Synchronizer {
        self.context.synchronizer()
    }

    /// Returns the context handed to handlers.
    pub const fn context(&self) -> &DriverContext {
        &self.context
    }

    /// Returns the handler registry.
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_owned())
}
