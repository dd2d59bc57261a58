//! Quiescence waits.

use async_trait::async_trait;
use lookout_protocol::{Command, CommandKind, ResponsePayload, WaitRequest};

use super::mismatched;
use crate::dispatch::context::DriverContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::registry::CommandHandler;

pub(super) struct WaitUntilNoTransientCallbacksHandler;

#[async_trait(?Send)]
impl CommandHandler for WaitUntilNoTransientCallbacksHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let WaitRequest { timeout } = match command {
            Command::WaitUntilNoTransientCallbacks(request) => request,
            other => return Err(mismatched(CommandKind::WaitUntilNoTransientCallbacks, &other)),
        };
        let deadline = timeout.map(|limit| context.deadline_after(limit));
        context
            .synchronizer()
            .wait_until_no_transient_callbacks(deadline)
            .await?;
        Ok(ResponsePayload::Empty)
    }
}

pub(super) struct WaitUntilFrameSyncHandler;

#[async_trait(?Send)]
impl CommandHandler for WaitUntilFrameSyncHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let WaitRequest { timeout } = match command {
            Command::WaitUntilFrameSync(request) => request,
            other => return Err(mismatched(CommandKind::WaitUntilFrameSync, &other)),
        };
        let deadline = timeout.map(|limit| context.deadline_after(limit));
        context.synchronizer().wait_until_idle(deadline).await?;
        Ok(ResponsePayload::Empty)
    }
}
