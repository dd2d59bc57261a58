//! Live element tree access for the Lookout driver extension.
//!
//! The application owns its element tree; Lookout only observes it. This
//! crate defines that observation seam and the algorithms run over it:
//!
//! - [`ElementTree`] is a read-only view of one structural snapshot, and
//!   [`TreeSource`] hands out a fresh snapshot per attempt.
//! - [`FinderResolver`] turns a [`lookout_protocol::Finder`] into a
//!   [`NodeSet`], with ancestor and descendant semantics.
//! - [`serialize`] produces bounded-depth diagnostics dumps of either tree
//!   flavour.
//! - [`MemoryTree`] and [`LiveTree`] are an arena-backed implementation for
//!   hosts that mirror their UI into plain data.
//!
//! # Example
//!
//! ```
//! use lookout_protocol::{Finder, ValueKey};
//! use lookout_tree::{Element, FinderResolver, MemoryTree, ResolvePolicy};
//!
//! let mut tree = MemoryTree::new();
//! let column = tree
//!     .insert_root(Element::new("Column").with_key(ValueKey::string("column")))
//!     .expect("empty tree");
//! tree.insert_child(column, Element::new("Text").with_text("Hello"))
//!     .expect("column exists");
//!
//! let resolver = FinderResolver::new(&tree, ResolvePolicy::default());
//! let finder = Finder::descendant(Finder::by_key("column"), Finder::by_text("Hello"), false);
//! assert_eq!(resolver.resolve(&finder).expect("resolve").len(), 1);
//! ```

mod diagnostics;
mod error;
mod geometry;
mod memory;
mod node;
mod resolver;
mod semantics;
mod tree;

pub use diagnostics::serialize;
pub use error::{ResolveError, TreeError};
pub use geometry::offset_of;
pub use kurbo::{Point, Rect};
pub use memory::{Element, LiveTree, MemoryTree, RenderObject};
pub use node::{DiagnosticsRef, NodeDiagnostics, NodeId, PropertyValue, RenderId, TreeProperty};
pub use resolver::{FinderResolver, NodeSet, ResolvePolicy};
pub use semantics::semantics_id_of;
pub use tree::{ElementTree, TreeSource};

#[cfg(test)]
mod tests;
