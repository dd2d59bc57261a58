//! Read-only access to the application's live tree.

use std::rc::Rc;

use kurbo::Rect;
use lookout_protocol::ValueKey;

use crate::node::{DiagnosticsRef, NodeDiagnostics, NodeId, RenderId};

/// Read-only view of one structural snapshot of the element tree.
///
/// Lookups on a handle the snapshot does not know return `None` or an empty
/// list rather than failing.
pub trait ElementTree {
    /// Returns the root element, or `None` for an empty tree.
    fn root(&self) -> Option<NodeId>;

    /// Returns the parent of `node`.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Returns the children of `node` in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Returns the key attached to `node`.
    fn key(&self, node: NodeId) -> Option<&ValueKey>;

    /// Returns the runtime type name of `node`.
    fn type_name(&self, node: NodeId) -> Option<&str>;

    /// Returns the text content of `node`, for elements that display text.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Returns the tooltip message of `node`.
    fn tooltip(&self, node: NodeId) -> Option<&str>;

    /// Returns the semantics label of `node`.
    fn semantics_label(&self, node: NodeId) -> Option<&str>;

    /// Returns the semantics id attached directly to `node`.
    fn semantics_id(&self, node: NodeId) -> Option<i64>;

    /// Returns whether `node` is laid out but not painted.
    fn is_offstage(&self, _node: NodeId) -> bool {
        false
    }

    /// Returns the global paint bounds of `node`.
    fn paint_bounds(&self, node: NodeId) -> Option<Rect>;

    /// Returns the render object backing `node`.
    fn render_object(&self, node: NodeId) -> Option<RenderId>;

    /// Returns the diagnostic data of a widget or render node.
    fn diagnostics(&self, node: DiagnosticsRef) -> Option<NodeDiagnostics>;

    /// Returns the diagnostic children of a widget or render node.
    fn diagnostics_children(&self, node: DiagnosticsRef) -> Vec<DiagnosticsRef>;
}

/// Source of fresh tree snapshots.
///
/// Each resolution attempt takes its own snapshot so handles never outlive
/// the structure they point into.
pub trait TreeSource {
    /// Returns the current structure of the tree.
    fn snapshot(&self) -> Rc<dyn ElementTree>;
}

impl<F> TreeSource for F
where
    F: Fn() -> Rc<dyn ElementTree>,
{
    fn snapshot(&self) -> Rc<dyn ElementTree> {
        self()
    }
}
