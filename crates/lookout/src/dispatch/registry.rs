//! Command handler registration.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use lookout_protocol::{Command, ResponsePayload};

use super::context::DriverContext;
use super::errors::DispatchError;

/// Executes one kind of command.
///
/// Handlers run on the host's UI thread and may suspend only on the
/// context's synchronizer or on collaborators they await.
#[async_trait(?Send)]
pub trait CommandHandler {
    /// Executes `command` and returns the payload to send back.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] that the dispatcher reports as an error
    /// envelope.
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError>;
}

/// Handlers keyed by the wire name of their command kind.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    handlers: HashMap<String, Rc<dyn CommandHandler>>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("CommandRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, returning the handler it replaces.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        handler: Rc<dyn CommandHandler>,
    ) -> Option<Rc<dyn CommandHandler>> {
        self.handlers.insert(kind.into(), handler)
    }

    /// Returns the handler registered for `kind`.
    pub fn get(&self, kind: &str) -> Option<Rc<dyn CommandHandler>> {
        self.handlers.get(kind).cloned()
    }

    /// Returns whether a handler is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Returns the registered kinds in arbitrary order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}
