//! DOM tree (arena-based allocation)

use crate::{Node, NodeData, NodeId};

/// Arena of nodes for one parsed document
#[derive(Debug, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Get a node by id
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    /// Append `child` to `parent`'s child list, fixing up the parent
    /// back-reference and positional index
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = match self.nodes.get_mut(parent.index()) {
            Some(p) => {
                p.children.push(child);
                p.children.len() - 1
            }
            None => return,
        };
        if let Some(c) = self.nodes.get_mut(child.index()) {
            c.parent = parent;
            c.index_in_parent = index;
        }
    }

    /// Direct children of a node, in source order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Approximate heap footprint in bytes
    pub fn memory_usage(&self) -> usize {
        let mut total = self.nodes.capacity() * std::mem::size_of::<Node>();
        for node in &self.nodes {
            total += node.children.capacity() * std::mem::size_of::<NodeId>();
            total += match &node.data {
                NodeData::Element(e) | NodeData::Template(e) => {
                    e.name.capacity()
                        + e.raw_tag.capacity()
                        + e.attrs
                            .iter()
                            .map(|a| a.name.capacity() + a.value.capacity())
                            .sum::<usize>()
                }
                NodeData::Text(t)
                | NodeData::CData(t)
                | NodeData::Comment(t)
                | NodeData::Whitespace(t) => t.capacity(),
                NodeData::Document => 0,
            };
        }
        total
    }
}
