//! Free-form data requests answered by the application.

use std::pin::pin;

use async_trait::async_trait;
use futures::future::{Either, select};
use lookout_protocol::{Command, CommandKind, RequestData, RequestDataResult, ResponsePayload};

use super::mismatched;
use crate::data::DataHandlerError;
use crate::dispatch::context::DriverContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::registry::CommandHandler;

pub(super) struct RequestDataHandler;

#[async_trait(?Send)]
impl CommandHandler for RequestDataHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let RequestData { message, timeout } = match command {
            Command::RequestData(request) => request,
            other => return Err(mismatched(CommandKind::RequestData, &other)),
        };
        let handler = context
            .data_handler()
            .ok_or_else(|| DispatchError::unknown_command(CommandKind::RequestData.as_str()))?;

        let reply = match timeout {
            None => handler.request_data(message).await?,
            Some(limit) => {
                let deadline = context.deadline_after(limit);
                let request = pin!(handler.request_data(message));
                let expiry = pin!(context.synchronizer().sleep_until(deadline));
                match select(request, expiry).await {
                    Either::Left((reply, _)) => reply?,
                    Either::Right(((), _)) => {
                        return Err(DataHandlerError::TimedOut(limit).into());
                    }
                }
            }
        };
        Ok(ResponsePayload::RequestData(RequestDataResult { message: reply }))
    }
}
