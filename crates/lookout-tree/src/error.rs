//! Error types for tree construction and finder resolution.

use lookout_protocol::Finder;
use thiserror::Error;

use crate::node::NodeId;

/// Errors returned while resolving a finder against a tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Exactly one element was required but none matched.
    #[error("no matching element for {finder}")]
    NoMatchingElement {
        /// Description of the finder that matched nothing.
        finder: String,
    },

    /// Exactly one element was required but several matched.
    #[error("too many matching elements ({count}) for {finder}")]
    AmbiguousMatch {
        /// Description of the finder that matched too much.
        finder: String,
        /// Number of matches found.
        count: usize,
    },

    /// A semantics label pattern is not a valid regular expression.
    #[error("invalid semantics label pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },
}

impl ResolveError {
    /// Creates a `NoMatchingElement` error for `finder`.
    #[must_use]
    pub fn no_matching_element(finder: &Finder) -> Self {
        Self::NoMatchingElement {
            finder: finder.to_string(),
        }
    }

    /// Creates an `AmbiguousMatch` error for `finder`.
    #[must_use]
    pub fn ambiguous_match(finder: &Finder, count: usize) -> Self {
        Self::AmbiguousMatch {
            finder: finder.to_string(),
            count,
        }
    }

    /// Creates an `InvalidPattern` error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: source.to_string(),
        }
    }
}

/// Errors returned by tree construction and traversal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The tree already has a root element.
    #[error("tree already has a root element")]
    RootAlreadySet,

    /// A handle does not refer to a node of this tree.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A diagnostics dump reached a node with no diagnostic data.
    #[error("no diagnostics available for {0}")]
    MissingDiagnostics(String),
}

impl TreeError {
    /// Creates a `MissingDiagnostics` error.
    #[must_use]
    pub fn missing_diagnostics(node: impl Into<String>) -> Self {
        Self::MissingDiagnostics(node.into())
    }
}
