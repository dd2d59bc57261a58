//! Health and session settings.

use async_trait::async_trait;
use lookout_protocol::{
    Command, CommandKind, HealthResult, HealthStatus, ResponsePayload, SetFrameSync,
};
use tracing::info;

use super::mismatched;
use crate::dispatch::DISPATCH_TARGET;
use crate::dispatch::context::DriverContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::registry::CommandHandler;

pub(super) struct GetHealthHandler;

#[async_trait(?Send)]
impl CommandHandler for GetHealthHandler {
    async fn handle(
        &self,
        command: Command,
        _context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        match command {
            Command::GetHealth => Ok(ResponsePayload::Health(HealthResult {
                status: HealthStatus::Ok,
            })),
            other => Err(mismatched(CommandKind::GetHealth, &other)),
        }
    }
}

pub(super) struct SetFrameSyncHandler;

#[async_trait(?Send)]
impl CommandHandler for SetFrameSyncHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let SetFrameSync { enabled } = match command {
            Command::SetFrameSync(request) => request,
            other => return Err(mismatched(CommandKind::SetFrameSync, &other)),
        };
        context.set_frame_sync(enabled);
        info!(target: DISPATCH_TARGET, enabled, "frame sync updated");
        Ok(ResponsePayload::Empty)
    }
}
