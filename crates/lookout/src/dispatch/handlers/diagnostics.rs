//! Diagnostics tree dumps.

use async_trait::async_trait;
use lookout_protocol::{Command, CommandKind, GetDiagnosticsTree, ResponsePayload, TreeType};
use lookout_tree::{DiagnosticsRef, FinderResolver, serialize};

use super::mismatched;
use crate::dispatch::context::DriverContext;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::registry::CommandHandler;

/// Dumps the widget or render subtree rooted at one element.
///
/// Reads a single snapshot without waiting on the synchronizer.
pub(super) struct GetDiagnosticsTreeHandler;

#[async_trait(?Send)]
impl CommandHandler for GetDiagnosticsTreeHandler {
    async fn handle(
        &self,
        command: Command,
        context: &DriverContext,
    ) -> Result<ResponsePayload, DispatchError> {
        let GetDiagnosticsTree {
            finder,
            tree_type,
            subtree_depth,
            include_properties,
        } = match command {
            Command::GetDiagnosticsTree(request) => request,
            other => return Err(mismatched(CommandKind::GetDiagnosticsTree, &other)),
        };

        let tree = context.snapshot();
        let node = FinderResolver::new(tree.as_ref(), context.policy()).resolve_single(&finder)?;
        let root = match tree_type {
            TreeType::Widget => DiagnosticsRef::Widget(node),
            TreeType::RenderObject => tree
                .render_object(node)
                .map(DiagnosticsRef::RenderObject)
                .ok_or_else(|| DispatchError::missing_render_object(&finder))?,
        };
        let dump = serialize(tree.as_ref(), root, subtree_depth, include_properties)?;
        Ok(ResponsePayload::Diagnostics(dump))
    }
}
