//! lurk DOM - arena-based HTML document tree
//!
//! Nodes live in a flat arena owned by the [`Document`] and are addressed
//! by stable [`NodeId`] indices; parent/child relations are id pairs, never
//! pointers. The tree is immutable once built.

mod document;
mod node;
mod query;
mod tag;
mod tree;

pub use document::Document;
pub use node::{Attribute, Doctype, ElementData, Node, NodeData, NodeKind};
pub use query::NodeRef;
pub use tag::HtmlTag;
pub use tree::DomTree;

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node" (detached parent, missing lookup)
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id refers to a node at all
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
