//! Node handles and the diagnostic data attached to them.

use std::fmt;

/// Handle to an element of the logical (widget) tree.
///
/// Handles are only meaningful for the snapshot that produced them and must
/// not be kept across commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a handle from a raw arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an object of the physical (render) tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderId(usize);

impl RenderId {
    /// Creates a handle from a raw arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A node of either diagnostics flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticsRef {
    /// A widget tree element.
    Widget(NodeId),
    /// A render tree object.
    RenderObject(RenderId),
}

/// Descriptive data of one diagnostics node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDiagnostics {
    /// Human-readable summary.
    pub description: String,
    /// Runtime type name, reported for widgets only.
    pub runtime_type: Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<TreeProperty>,
}

/// A named property of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeProperty {
    /// Property name.
    pub name: String,
    /// Typed property value.
    pub value: PropertyValue,
}

impl TreeProperty {
    /// Creates a property.
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Typed value of a [`TreeProperty`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A string value.
    String(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Double(f64),
    /// A boolean flag.
    Flag(bool),
    /// A member of an enumeration, by name.
    Enum(String),
    /// Any other value, pre-rendered by the tree.
    Object {
        /// Runtime type of the value.
        type_name: String,
        /// Rendered value.
        description: String,
    },
}

impl PropertyValue {
    /// Renders the value as it appears in a diagnostics dump.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::String(value) => format!("\"{value}\""),
            Self::Int(value) => value.to_string(),
            Self::Double(value) => format!("{value:.1}"),
            Self::Flag(value) => value.to_string(),
            Self::Enum(name) => name.clone(),
            Self::Object { description, .. } => description.clone(),
        }
    }

    /// Returns the runtime type tag of the value.
    #[must_use]
    pub fn property_type(&self) -> String {
        match self {
            Self::String(_) => "StringProperty".to_owned(),
            Self::Int(_) => "IntProperty".to_owned(),
            Self::Double(_) => "DoubleProperty".to_owned(),
            Self::Flag(_) => "FlagProperty".to_owned(),
            Self::Enum(_) => "EnumProperty".to_owned(),
            Self::Object { type_name, .. } => format!("DiagnosticsProperty<{type_name}>"),
        }
    }
}
