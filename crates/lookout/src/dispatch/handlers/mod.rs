//! Built-in command handlers.

mod diagnostics;
mod finders;
mod request_data;
mod session;
mod wait;

use std::rc::Rc;

use lookout_protocol::{Command, CommandKind};

use super::errors::DispatchError;
use super::registry::CommandRegistry;

/// Registers every built-in handler.
///
/// `RequestData` is registered only when the application supplied a data
/// handler.
pub(crate) fn register_builtins(registry: &mut CommandRegistry, with_data_handler: bool) {
    registry.register(
        CommandKind::WaitUntilNoTransientCallbacks.as_str(),
        Rc::new(wait::WaitUntilNoTransientCallbacksHandler),
    );
    registry.register(
        CommandKind::WaitUntilFrameSync.as_str(),
        Rc::new(wait::WaitUntilFrameSyncHandler),
    );
    registry.register(
        CommandKind::GetSemanticsId.as_str(),
        Rc::new(finders::GetSemanticsIdHandler),
    );
    registry.register(
        CommandKind::GetOffset.as_str(),
        Rc::new(finders::GetOffsetHandler),
    );
    registry.register(CommandKind::GetText.as_str(), Rc::new(finders::GetTextHandler));
    registry.register(CommandKind::WaitFor.as_str(), Rc::new(finders::WaitForHandler));
    registry.register(
        CommandKind::WaitForAbsent.as_str(),
        Rc::new(finders::WaitForAbsentHandler),
    );
    registry.register(
        CommandKind::GetDiagnosticsTree.as_str(),
        Rc::new(diagnostics::GetDiagnosticsTreeHandler),
    );
    registry.register(
        CommandKind::GetHealth.as_str(),
        Rc::new(session::GetHealthHandler),
    );
    registry.register(
        CommandKind::SetFrameSync.as_str(),
        Rc::new(session::SetFrameSyncHandler),
    );
    if with_data_handler {
        registry.register(
            CommandKind::RequestData.as_str(),
            Rc::new(request_data::RequestDataHandler),
        );
    }
}

fn mismatched(expected: CommandKind, command: &Command) -> DispatchError {
    DispatchError::internal(format!(
        "{expected} handler received a {} command",
        command.kind()
    ))
}
