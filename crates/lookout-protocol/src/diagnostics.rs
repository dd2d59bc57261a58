//! Serialisable diagnostics snapshots.

use serde::{Deserialize, Serialize};

/// One node of a diagnostics dump.
///
/// `children` and `properties` distinguish "not requested" (`None`, key
/// omitted) from "requested and empty" (`Some` of an empty list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsNode {
    /// Human-readable summary of the node.
    pub description: String,
    /// Runtime type of the widget, when the node describes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_runtime_type: Option<String>,
    /// Properties of the node, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<DiagnosticsProperty>>,
    /// Child nodes, when the depth budget allowed exploring them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DiagnosticsNode>>,
}

/// A named property of a diagnostics node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsProperty {
    /// Property name.
    pub name: String,
    /// Rendered property value.
    pub description: String,
    /// Runtime type tag of the property value.
    pub property_type: String,
}

impl DiagnosticsNode {
    /// Creates a leaf node with only a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            widget_runtime_type: None,
            properties: None,
            children: None,
        }
    }
}
