//! Document - owner of one parsed HTML tree

use crate::{Doctype, DomTree, NodeId, NodeRef};

/// A fully parsed HTML document.
///
/// Owns the normalized source buffer and the node arena. Built once by
/// the parser in `lurk-html`; immutable afterwards. All nodes are
/// released together when the document is dropped.
pub struct Document {
    raw_html: String,
    tree: DomTree,
    doctype: Option<Doctype>,
    document_node: NodeId,
    root: NodeId,
}

impl Document {
    /// Assemble a document from parser output. `document_node` is the
    /// synthetic wrapper node, `root` the `<html>` element.
    pub fn new(
        raw_html: String,
        tree: DomTree,
        doctype: Option<Doctype>,
        document_node: NodeId,
        root: NodeId,
    ) -> Self {
        Self {
            raw_html,
            tree,
            doctype,
            document_node,
            root,
        }
    }

    /// The normalized buffer the tree was parsed from
    pub fn raw_html(&self) -> &str {
        &self.raw_html
    }

    /// The node arena
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// DOCTYPE declaration, if the source carried one
    pub fn doctype(&self) -> Option<&Doctype> {
        self.doctype.as_ref()
    }

    /// Synthetic document wrapper node
    pub fn document_node(&self) -> NodeRef<'_> {
        // Set at construction, always present in the arena.
        match self.node(self.document_node) {
            Some(n) => n,
            None => unreachable!("document node missing from arena"),
        }
    }

    /// Root `<html>` element
    pub fn root(&self) -> NodeRef<'_> {
        match self.node(self.root) {
            Some(n) => n,
            None => unreachable!("root element missing from arena"),
        }
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::new(self, id)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Approximate heap footprint in bytes
    pub fn memory_usage(&self) -> usize {
        self.raw_html.capacity() + self.tree.memory_usage()
    }
}
