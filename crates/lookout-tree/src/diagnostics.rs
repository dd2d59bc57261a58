//! Bounded-depth diagnostics dumps.

use lookout_protocol::{DiagnosticsNode, DiagnosticsProperty};

use crate::error::TreeError;
use crate::node::{DiagnosticsRef, NodeDiagnostics, TreeProperty};
use crate::tree::ElementTree;

/// Serialises `node` and up to `max_depth` levels of its descendants.
///
/// With `max_depth == 0` the result carries no `children` at all. Every node
/// that was explored gets a `children` list, empty for leaves. Properties are
/// attached only when `include_properties` is set. Widget and render nodes
/// follow the same rules.
///
/// # Errors
///
/// Returns [`TreeError::MissingDiagnostics`] if the tree has no diagnostic
/// data for `node` or one of the explored descendants.
pub fn serialize(
    tree: &dyn ElementTree,
    node: DiagnosticsRef,
    max_depth: u32,
    include_properties: bool,
) -> Result<DiagnosticsNode, TreeError> {
    let NodeDiagnostics {
        description,
        runtime_type,
        properties: tree_properties,
    } = tree
        .diagnostics(node)
        .ok_or_else(|| TreeError::missing_diagnostics(describe(node)))?;

    let properties =
        include_properties.then(|| tree_properties.iter().map(to_protocol_property).collect());

    let children = max_depth
        .checked_sub(1)
        .map(|remaining| {
            tree.diagnostics_children(node)
                .into_iter()
                .map(|child| serialize(tree, child, remaining, include_properties))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(DiagnosticsNode {
        description,
        widget_runtime_type: runtime_type,
        properties,
        children,
    })
}

fn to_protocol_property(property: &TreeProperty) -> DiagnosticsProperty {
    DiagnosticsProperty {
        name: property.name.clone(),
        description: property.value.description(),
        property_type: property.value.property_type(),
    }
}

fn describe(node: DiagnosticsRef) -> String {
    match node {
        DiagnosticsRef::Widget(id) => format!("widget {id}"),
        DiagnosticsRef::RenderObject(id) => format!("render object #{}", id.index()),
    }
}
