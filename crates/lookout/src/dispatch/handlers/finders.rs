//! Commands that locate one element and read from it.

use async_trait::async_trait;
use lookout_protocol::{
    Command, CommandKind, FinderRequest, GetOffset, OffsetResult, ResponsePayload,
    SemanticsIdResult, TextResult,
};
use lookout_tree::{FinderResolver, ResolveError, offset_of, semantics_id_of};

use super::mismatched;
use crate::dispatch::context::DriverContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::registry::CommandHandler;

pub(super) struct GetTextHandler;

#[async_trait(?Send)]
impl CommandHandler for GetTextHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let FinderRequest { finder, timeout } = match command {
            Command::GetText(request) => request,
            other => return Err(mismatched(CommandKind::GetText, &other)),
        };
        context
            .poll_tree(timeout, |tree| {
                let node = FinderResolver::new(tree, context.policy()).resolve_single(&finder)?;
                let text = tree.text(node).ok_or_else(|| {
                    DispatchError::unsupported_element(&finder, "element does not display text")
                })?;
                Ok(ResponsePayload::Text(TextResult {
                    text: text.to_owned(),
                }))
            })
            .await
    }
}

pub(super) struct GetSemanticsIdHandler;

#[async_trait(?Send)]
impl CommandHandler for GetSemanticsIdHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let FinderRequest { finder, timeout } = match command {
            Command::GetSemanticsId(request) => request,
            other => return Err(mismatched(CommandKind::GetSemanticsId, &other)),
        };
        context
            .poll_tree(timeout, |tree| {
                let node = FinderResolver::new(tree, context.policy()).resolve_single(&finder)?;
                let id = semantics_id_of(tree, node)
                    .ok_or_else(|| DispatchError::missing_semantics(&finder))?;
                Ok(ResponsePayload::SemanticsId(SemanticsIdResult { id }))
            })
            .await
    }
}

pub(super) struct GetOffsetHandler;

#[async_trait(?Send)]
impl CommandHandler for GetOffsetHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let GetOffset { finder, offset_type, timeout } = match command {
            Command::GetOffset(request) => request,
            other => return Err(mismatched(CommandKind::GetOffset, &other)),
        };
        context
            .poll_tree(timeout, |tree| {
                let node = FinderResolver::new(tree, context.policy()).resolve_single(&finder)?;
                let bounds = tree
                    .paint_bounds(node)
                    .ok_or_else(|| DispatchError::missing_geometry(&finder))?;
                let point = offset_of(bounds, offset_type);
                Ok(ResponsePayload::Offset(OffsetResult {
                    dx: point.x,
                    dy: point.y,
                }))
            })
            .await
    }
}

pub(super) struct WaitForHandler;

#[async_trait(?Send)]
impl CommandHandler for WaitForHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let FinderRequest { finder, timeout } = match command {
            Command::WaitFor(request) => request,
            other => return Err(mismatched(CommandKind::WaitFor, &other)),
        };
        context
            .poll_tree(timeout, |tree| {
                let matches = FinderResolver::new(tree, context.policy()).resolve(&finder)?;
                if matches.is_empty() {
                    return Err(ResolveError::no_matching_element(&finder).into());
                }
                Ok(ResponsePayload::Empty)
            })
            .await
    }
}

pub(super) struct WaitForAbsentHandler;

#[async_trait(?Send)]
impl CommandHandler for WaitForAbsentHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let FinderRequest { finder, timeout } = match command {
            Command::WaitForAbsent(request) => request,
            other => return Err(mismatched(CommandKind::WaitForAbsent, &other)),
        };
        context
            .poll_tree(timeout, |tree| {
                match FinderResolver::new(tree, context.policy()).resolve(&finder) {
                    Ok(matches) if !matches.is_empty() => {
                        Err(DispatchError::still_present(&finder))
                    }
                    // A vanished relational anchor means the target is gone too.
                    Ok(_) | Err(ResolveError::NoMatchingElement { .. }) => {
                        Ok(ResponsePayload::Empty)
                    }
                    Err(error) => Err(error.into()),
                }
            })
            .await
    }
}
