//! Semantics lookups.

use crate::node::NodeId;
use crate::tree::ElementTree;

/// Returns the semantics id of `node` or of its nearest ancestor carrying
/// one.
#[must_use]
pub fn semantics_id_of(tree: &dyn ElementTree, node: NodeId) -> Option<i64> {
    let mut current = Some(node);
    while let Some(id) = current {
        if let Some(semantics_id) = tree.semantics_id(id) {
            return Some(semantics_id);
        }
        current = tree.parent(id);
    }
    None
}
