//! Arena-backed element tree.
//!
//! [`MemoryTree`] is a complete [`ElementTree`] for hosts that mirror their
//! UI into a plain data structure, and for tests. [`LiveTree`] wraps one in a
//! shared cell so the host can swap or edit the structure between ticks while
//! handlers keep reading consistent snapshots.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Rect;
use lookout_protocol::ValueKey;

use crate::error::TreeError;
use crate::node::{DiagnosticsRef, NodeDiagnostics, NodeId, RenderId, TreeProperty};
use crate::tree::{ElementTree, TreeSource};

/// Description of one element, built up before insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    type_name: String,
    key: Option<ValueKey>,
    text: Option<String>,
    tooltip: Option<String>,
    semantics_label: Option<String>,
    semantics_id: Option<i64>,
    bounds: Option<Rect>,
    offstage: bool,
    properties: Vec<TreeProperty>,
    render_object: Option<RenderObject>,
}

impl Element {
    /// Creates an element of the given runtime type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key: None,
            text: None,
            tooltip: None,
            semantics_label: None,
            semantics_id: None,
            bounds: None,
            offstage: false,
            properties: Vec::new(),
            render_object: None,
        }
    }

    /// Attaches a key.
    #[must_use]
    pub fn with_key(mut self, key: ValueKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the displayed text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the tooltip message.
    #[must_use]
    pub fn with_tooltip(mut self, message: impl Into<String>) -> Self {
        self.tooltip = Some(message.into());
        self
    }

    /// Sets the semantics label.
    #[must_use]
    pub fn with_semantics_label(mut self, label: impl Into<String>) -> Self {
        self.semantics_label = Some(label.into());
        self
    }

    /// Sets the semantics id.
    #[must_use]
    pub const fn with_semantics_id(mut self, id: i64) -> Self {
        self.semantics_id = Some(id);
        self
    }

    /// Sets the global paint bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Marks the element and its subtree as offstage.
    #[must_use]
    pub const fn offstage(mut self) -> Self {
        self.offstage = true;
        self
    }

    /// Appends a diagnostic property.
    #[must_use]
    pub fn with_property(mut self, property: TreeProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Backs the element with a render object.
    #[must_use]
    pub fn with_render_object(mut self, render_object: RenderObject) -> Self {
        self.render_object = Some(render_object);
        self
    }

    fn description(&self) -> String {
        self.key.as_ref().map_or_else(
            || self.type_name.clone(),
            |key| format!("{}-{key}", self.type_name),
        )
    }
}

/// Description of one render object.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderObject {
    type_name: String,
    properties: Vec<TreeProperty>,
}

impl RenderObject {
    /// Creates a render object of the given runtime type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
        }
    }

    /// Appends a diagnostic property.
    #[must_use]
    pub fn with_property(mut self, property: TreeProperty) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ElementEntry {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    render: Option<RenderId>,
}

#[derive(Debug, Clone, PartialEq)]
struct RenderEntry {
    object: RenderObject,
    children: Vec<RenderId>,
}

/// An element tree held entirely in memory.
///
/// Nodes are never removed; build a new tree to reflect structural changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTree {
    elements: Vec<ElementEntry>,
    renders: Vec<RenderEntry>,
}

impl MemoryTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns whether the tree has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Inserts the root element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::RootAlreadySet`] if the tree already has a root.
    pub fn insert_root(&mut self, element: Element) -> Result<NodeId, TreeError> {
        if !self.elements.is_empty() {
            return Err(TreeError::RootAlreadySet);
        }
        Ok(self.push(element, None))
    }

    /// Appends `element` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `parent` is not in this tree.
    pub fn insert_child(&mut self, parent: NodeId, element: Element) -> Result<NodeId, TreeError> {
        if self.entry(parent).is_none() {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = self.push(element, Some(parent));
        if let Some(entry) = self.elements.get_mut(parent.index()) {
            entry.children.push(id);
        }
        Ok(id)
    }

    /// Replaces the text of an existing element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `node` is not in this tree.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        let entry = self
            .elements
            .get_mut(node.index())
            .ok_or(TreeError::UnknownNode(node))?;
        entry.element.text = Some(text.into());
        Ok(())
    }

    /// Moves an element on or off stage.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `node` is not in this tree.
    pub fn set_offstage(&mut self, node: NodeId, offstage: bool) -> Result<(), TreeError> {
        let entry = self
            .elements
            .get_mut(node.index())
            .ok_or(TreeError::UnknownNode(node))?;
        entry.element.offstage = offstage;
        Ok(())
    }

    fn push(&mut self, mut element: Element, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.elements.len());
        let render = element.render_object.take().map(|object| {
            let render_id = RenderId::new(self.renders.len());
            let render_parent = parent.and_then(|ancestor| self.nearest_render(ancestor));
            self.renders.push(RenderEntry {
                object,
                children: Vec::new(),
            });
            if let Some(entry) = render_parent.and_then(|owner| self.renders.get_mut(owner.index())) {
                entry.children.push(render_id);
            }
            render_id
        });
        self.elements.push(ElementEntry {
            element,
            parent,
            children: Vec::new(),
            render,
        });
        id
    }

    /// Returns the render object of `node` or of its nearest ancestor.
    fn nearest_render(&self, node: NodeId) -> Option<RenderId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let entry = self.entry(id)?;
            if entry.render.is_some() {
                return entry.render;
            }
            current = entry.parent;
        }
        None
    }

    fn entry(&self, node: NodeId) -> Option<&ElementEntry> {
        self.elements.get(node.index())
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.entry(node).map(|entry| &entry.element)
    }
}

impl ElementTree for MemoryTree {
    fn root(&self) -> Option<NodeId> {
        (!self.elements.is_empty()).then(|| NodeId::new(0))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|entry| entry.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.entry(node)
            .map(|entry| entry.children.clone())
            .unwrap_or_default()
    }

    fn key(&self, node: NodeId) -> Option<&ValueKey> {
        self.element(node).and_then(|element| element.key.as_ref())
    }

    fn type_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.type_name.as_str())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|element| element.text.as_deref())
    }

    fn tooltip(&self, node: NodeId) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.tooltip.as_deref())
    }

    fn semantics_label(&self, node: NodeId) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.semantics_label.as_deref())
    }

    fn semantics_id(&self, node: NodeId) -> Option<i64> {
        self.element(node).and_then(|element| element.semantics_id)
    }

    fn is_offstage(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|element| element.offstage)
    }

    fn paint_bounds(&self, node: NodeId) -> Option<Rect> {
        self.element(node).and_then(|element| element.bounds)
    }

    fn render_object(&self, node: NodeId) -> Option<RenderId> {
        self.entry(node).and_then(|entry| entry.render)
    }

    fn diagnostics(&self, node: DiagnosticsRef) -> Option<NodeDiagnostics> {
        match node {
            DiagnosticsRef::Widget(id) => self.element(id).map(|element| NodeDiagnostics {
                description: element.description(),
                runtime_type: Some(element.type_name.clone()),
                properties: element.properties.clone(),
            }),
            DiagnosticsRef::RenderObject(id) => {
                self.renders.get(id.index()).map(|entry| NodeDiagnostics {
                    description: entry.object.type_name.clone(),
                    runtime_type: None,
                    properties: entry.object.properties.clone(),
                })
            }
        }
    }

    fn diagnostics_children(&self, node: DiagnosticsRef) -> Vec<DiagnosticsRef> {
        match node {
            DiagnosticsRef::Widget(id) => self
                .children(id)
                .into_iter()
                .map(DiagnosticsRef::Widget)
                .collect(),
            DiagnosticsRef::RenderObject(id) => self
                .renders
                .get(id.index())
                .map(|entry| {
                    entry
                        .children
                        .iter()
                        .copied()
                        .map(DiagnosticsRef::RenderObject)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// A [`MemoryTree`] the host can update while snapshots are outstanding.
///
/// Snapshots share structure with the live tree until the next update, which
/// copies on write.
#[derive(Debug, Default)]
pub struct LiveTree {
    current: RefCell<Rc<MemoryTree>>,
}

impl LiveTree {
    /// Creates a live tree holding `tree`.
    #[must_use]
    pub fn new(tree: MemoryTree) -> Self {
        Self {
            current: RefCell::new(Rc::new(tree)),
        }
    }

    /// Replaces the whole tree.
    pub fn replace(&self, tree: MemoryTree) {
        *self.current.borrow_mut() = Rc::new(tree);
    }

    /// Edits the tree in place, returning the closure's result.
    pub fn update<T>(&self, edit: impl FnOnce(&mut MemoryTree) -> T) -> T {
        let mut current = self.current.borrow_mut();
        edit(Rc::make_mut(&mut current))
    }

    /// Returns a strongly typed snapshot of the current tree.
    #[must_use]
    pub fn current(&self) -> Rc<MemoryTree> {
        Rc::clone(&self.current.borrow())
    }
}

impl TreeSource for LiveTree {
    fn snapshot(&self) -> Rc<dyn ElementTree> {
        self.current()
    }
}
