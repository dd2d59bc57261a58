//! Finder resolution over one tree snapshot.

use std::collections::HashSet;

use lookout_protocol::{Finder, LabelPattern, Relation, ValueKey};
use regex::Regex;

use crate::error::ResolveError;
use crate::node::NodeId;
use crate::tree::ElementTree;

/// Visibility rules applied while resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Treat offstage elements and their subtrees as absent.
    pub skip_offstage: bool,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            skip_offstage: true,
        }
    }
}

/// Elements matched by a finder, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    nodes: Vec<NodeId>,
}

impl NodeSet {
    /// Creates a set from nodes already in document order.
    #[must_use]
    pub const fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    /// Returns the matched nodes.
    #[must_use]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns the number of matches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether nothing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the only match.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoMatchingElement`] for an empty set and
    /// [`ResolveError::AmbiguousMatch`] for more than one match. Both name
    /// `finder`.
    pub fn single(&self, finder: &Finder) -> Result<NodeId, ResolveError> {
        match self.nodes.as_slice() {
            [] => Err(ResolveError::no_matching_element(finder)),
            [node] => Ok(*node),
            nodes => Err(ResolveError::ambiguous_match(finder, nodes.len())),
        }
    }
}

impl IntoIterator for NodeSet {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Resolves [`Finder`] specifications against a tree snapshot.
///
/// Resolution is read-only: resolving the same finder twice against an
/// unchanged snapshot yields the same set.
pub struct FinderResolver<'a> {
    tree: &'a dyn ElementTree,
    policy: ResolvePolicy,
}

impl<'a> FinderResolver<'a> {
    /// Creates a resolver over `tree`.
    #[must_use]
    pub fn new(tree: &'a dyn ElementTree, policy: ResolvePolicy) -> Self {
        Self { tree, policy }
    }

    /// Returns every element matching `finder`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if a relational anchor does not resolve to
    /// exactly one element or a label pattern is invalid.
    pub fn resolve(&self, finder: &Finder) -> Result<NodeSet, ResolveError> {
        match finder {
            Finder::Descendant(relation) => self.descendants(relation),
            Finder::Ancestor(relation) => self.ancestor(relation),
            Finder::ByValueKey(key) => Ok(self.scan(&Matcher::Key(key))),
            Finder::ByText(text) => Ok(self.scan(&Matcher::Text(text))),
            Finder::ByType(type_name) => Ok(self.scan(&Matcher::Type(type_name))),
            Finder::ByTooltipMessage(text) => Ok(self.scan(&Matcher::Tooltip(text))),
            Finder::BySemanticsLabel(pattern) => Ok(self.scan(&Matcher::label(pattern)?)),
        }
    }

    /// Returns the single element matching `finder`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoMatchingElement`] or
    /// [`ResolveError::AmbiguousMatch`] unless exactly one element matches.
    pub fn resolve_single(&self, finder: &Finder) -> Result<NodeId, ResolveError> {
        self.resolve(finder)?.single(finder)
    }

    fn descendants(&self, relation: &Relation) -> Result<NodeSet, ResolveError> {
        let anchor = self.resolve_single(&relation.of)?;
        let matching = self.resolve(&relation.matching)?;
        let nodes = matching
            .into_iter()
            .filter(|&node| {
                if node == anchor {
                    relation.match_root
                } else {
                    self.is_ancestor(anchor, node)
                }
            })
            .collect();
        Ok(NodeSet::new(nodes))
    }

    fn ancestor(&self, relation: &Relation) -> Result<NodeSet, ResolveError> {
        let anchor = self.resolve_single(&relation.of)?;
        let matching: HashSet<NodeId> = self.resolve(&relation.matching)?.into_iter().collect();

        let mut current = if relation.match_root {
            Some(anchor)
        } else {
            self.tree.parent(anchor)
        };
        while let Some(node) = current {
            if matching.contains(&node) {
                return Ok(NodeSet::new(vec![node]));
            }
            current = self.tree.parent(node);
        }
        Ok(NodeSet::default())
    }

    fn scan(&self, matcher: &Matcher<'_>) -> NodeSet {
        let nodes = self
            .visible_nodes()
            .into_iter()
            .filter(|&node| matcher.matches(self.tree, node))
            .collect();
        NodeSet::new(nodes)
    }

    /// Walks the tree in pre-order, pruning offstage subtrees per policy.
    fn visible_nodes(&self) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut stack: Vec<NodeId> = self.tree.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            if self.policy.skip_offstage && self.tree.is_offstage(node) {
                continue;
            }
            visited.push(node);
            stack.extend(self.tree.children(node).into_iter().rev());
        }
        visited
    }

    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.tree.parent(node);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.tree.parent(parent);
        }
        false
    }
}

/// A base finder prepared for repeated matching.
enum Matcher<'f> {
    Key(&'f ValueKey),
    Text(&'f str),
    Type(&'f str),
    Tooltip(&'f str),
    Label(&'f str),
    LabelPattern(Regex),
}

impl<'f> Matcher<'f> {
    fn label(pattern: &'f LabelPattern) -> Result<Self, ResolveError> {
        if !pattern.is_regex {
            return Ok(Self::Label(&pattern.label));
        }
        Regex::new(&pattern.label)
            .map(Self::LabelPattern)
            .map_err(|error| ResolveError::invalid_pattern(&pattern.label, &error))
    }

    fn matches(&self, tree: &dyn ElementTree, node: NodeId) -> bool {
        match self {
            Self::Key(key) => tree.key(node) == Some(*key),
            Self::Text(text) => tree.text(node) == Some(*text),
            Self::Type(type_name) => tree.type_name(node) == Some(*type_name),
            Self::Tooltip(text) => tree.tooltip(node) == Some(*text),
            Self::Label(label) => tree.semantics_label(node) == Some(*label),
            Self::LabelPattern(pattern) => tree
                .semantics_label(node)
                .is_some_and(|label| pattern.is_match(label)),
        }
    }
}
