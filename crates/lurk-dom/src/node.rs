//! DOM node payloads
//!
//! A node's kind is fixed at construction and decides which accessors
//! apply: tag/attribute accessors for Element/Template nodes, text
//! accessors for Text/CData/Comment/Whitespace nodes.

use crate::{HtmlTag, NodeId};
use std::ops::Range;

/// Node kind, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    CData,
    Comment,
    Whitespace,
    Template,
}

/// One element attribute as declared in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Declared name, lowercased
    pub name: String,
    /// Decoded value (entity references resolved)
    pub value: String,
    /// Quote character used in source: `Some('"')`, `Some('\'')`, or
    /// `None` for unquoted values and bare boolean attributes
    pub quote: Option<char>,
}

/// DOCTYPE declaration carried by the document node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

/// Element payload shared by Element and Template nodes
#[derive(Debug)]
pub struct ElementData {
    pub tag: HtmlTag,
    /// Tag name as parsed from source, lowercased
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Byte span of the opening tag in the source buffer
    pub span: Range<usize>,
    /// Original opening-tag text
    pub raw_tag: String,
}

impl ElementData {
    /// Attribute lookup by declared name (names are normalized to
    /// lowercase at parse time, lookup ignores ASCII case)
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Kind-specific node data
#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Template(ElementData),
    Text(String),
    CData(String),
    Comment(String),
    Whitespace(String),
}

/// One arena node
#[derive(Debug)]
pub struct Node {
    /// Owning parent (`NodeId::NONE` for the document node)
    pub parent: NodeId,
    /// Position among the parent's children
    pub index_in_parent: usize,
    /// Direct children in source order
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            index_in_parent: 0,
            children: Vec::new(),
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Document => NodeKind::Document,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Template(_) => NodeKind::Template,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::CData(_) => NodeKind::CData,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Whitespace(_) => NodeKind::Whitespace,
        }
    }

    /// Element payload, for Element and Template nodes
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) | NodeData::Template(e) => Some(e),
            _ => None,
        }
    }

    /// Literal text, for Text/CData/Comment/Whitespace nodes
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t)
            | NodeData::CData(t)
            | NodeData::Comment(t)
            | NodeData::Whitespace(t) => Some(t),
            _ => None,
        }
    }
}
