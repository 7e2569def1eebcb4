//! Node accessors and structural queries
//!
//! [`NodeRef`] is a cheap borrow of one arena node plus its owning
//! document. Kind-inapplicable accessor calls and invalid arguments are
//! contract violations: they trip a `debug_assert!` and degrade to the
//! empty/`None` fallback in release builds.

use crate::{Document, ElementData, HtmlTag, NodeId};
use crate::node::Node;
use std::ops::Range;

const ID_ATTRIBUTE: &str = "id";
const CLASS_ATTRIBUTE: &str = "class";

/// Check a caller-side contract; logs and reports the violation
fn contract(ok: bool, what: &str) -> bool {
    debug_assert!(ok, "DOM contract violation: {what}");
    if !ok {
        tracing::warn!("DOM contract violation: {what}");
    }
    ok
}

/// Borrowed view of one node in a parsed document
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    node: &'a Node,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Option<Self> {
        let node = doc.tree().get(id)?;
        Some(Self { doc, node, id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn kind(&self) -> crate::NodeKind {
        self.node.kind()
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), crate::NodeKind::Element | crate::NodeKind::Template)
    }

    pub fn is_text(&self) -> bool {
        self.kind() == crate::NodeKind::Text
    }

    pub fn is_document(&self) -> bool {
        self.kind() == crate::NodeKind::Document
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind() == crate::NodeKind::Whitespace
    }

    fn element(&self) -> Option<&'a ElementData> {
        self.node.as_element()
    }

    // ----- positional metadata -----

    /// Parent node; `None` for the document node
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        NodeRef::new(self.doc, self.node.parent)
    }

    /// Index among the parent's children
    pub fn index_in_parent(&self) -> usize {
        self.node.index_in_parent
    }

    /// Root-ward chain of (tag name, index in parent) pairs for this
    /// element, root-first; empty for non-element nodes
    pub fn path(&self) -> Vec<(String, usize)> {
        if !self.is_element() {
            return Vec::new();
        }
        let mut result = Vec::new();
        let mut cur = Some(*self);
        while let Some(node) = cur {
            if node.is_document() {
                break;
            }
            if node.is_element() {
                let name = node.tag_name().unwrap_or_default().to_string();
                result.push((name, node.index_in_parent()));
            }
            cur = node.parent();
        }
        result.reverse();
        result
    }

    // ----- element accessors -----

    /// Normalized tag identifier; `Unknown` for non-element nodes
    pub fn tag(&self) -> HtmlTag {
        self.element().map(|e| e.tag).unwrap_or(HtmlTag::Unknown)
    }

    /// Normalized tag name. For vendor/unknown tags the name is derived
    /// from the node's original raw source text.
    pub fn tag_name(&self) -> Option<&'a str> {
        if !contract(self.is_element(), "tag_name() requires an element node") {
            return None;
        }
        let elem = self.element()?;
        if elem.tag != HtmlTag::Unknown {
            return Some(elem.tag.name());
        }
        Some(tag_name_from_raw(&elem.raw_tag).unwrap_or(elem.name.as_str()))
    }

    /// Attribute value by declared name; name must be non-empty
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        if !contract(self.is_element(), "attribute() requires an element node") {
            return None;
        }
        if !contract(!name.is_empty(), "attribute() requires a non-empty name") {
            return None;
        }
        self.element()?.attr(name).map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attribute_count(&self) -> usize {
        if !contract(self.is_element(), "attribute_count() requires an element node") {
            return 0;
        }
        self.element().map(|e| e.attrs.len()).unwrap_or(0)
    }

    pub fn id_attribute(&self) -> Option<&'a str> {
        self.attribute(ID_ATTRIBUTE)
    }

    pub fn has_id_attribute(&self) -> bool {
        self.id_attribute().is_some()
    }

    pub fn class_attribute(&self) -> Option<&'a str> {
        self.attribute(CLASS_ATTRIBUTE)
    }

    pub fn has_class_attribute(&self) -> bool {
        self.class_attribute().is_some()
    }

    // ----- children -----

    /// Direct children in source order, optionally elements only.
    /// A childless element yields an empty sequence, never an error.
    pub fn children(&self, elements_only: bool) -> Vec<NodeRef<'a>> {
        self.doc
            .tree()
            .children(self.id)
            .iter()
            .filter_map(|&id| NodeRef::new(self.doc, id))
            .filter(|n| !elements_only || n.is_element())
            .collect()
    }

    pub fn child_count(&self, elements_only: bool) -> usize {
        self.children(elements_only).len()
    }

    /// Number of direct Text-kind children
    pub fn text_children_count(&self) -> usize {
        self.children(false).iter().filter(|n| n.is_text()).count()
    }

    // ----- text accessors -----

    /// Literal decoded text of a text-like node
    pub fn inner_text(&self) -> Option<&'a str> {
        let ok = self.node.as_text().is_some();
        if !contract(ok, "inner_text() requires a text-like node") {
            return None;
        }
        self.node.as_text()
    }

    /// Concatenated text of all direct Text-kind children, in order.
    /// Element and comment children are skipped, not recursed into.
    pub fn children_inner_text(&self) -> String {
        if !contract(self.is_element(), "children_inner_text() requires an element node") {
            return String::new();
        }
        let mut value = String::new();
        for child in self.children(false) {
            if child.is_text() {
                if let Some(text) = child.node.as_text() {
                    value.push_str(text);
                }
            }
        }
        value
    }

    // ----- structural lookups -----

    /// Nth direct child with the given tag (0-based, counting only
    /// same-tag element children). Returns the child and the occurrence
    /// index actually matched.
    pub fn child_by_tag(&self, tag: HtmlTag, occurrence: usize) -> Option<(NodeRef<'a>, usize)> {
        if !contract(self.is_element(), "child_by_tag() requires an element node") {
            return None;
        }
        let mut matched = 0;
        for child in self.children(true) {
            if child.tag() == tag {
                if matched == occurrence {
                    return Some((child, matched));
                }
                matched += 1;
            }
        }
        None
    }

    /// Walk a fixed positional path: at each step the child at the given
    /// index (counting all children) must exist and be an element with
    /// the given tag, otherwise the whole lookup fails. An out-of-range
    /// index fails cleanly.
    pub fn descendant_by_path(&self, path: &[(HtmlTag, usize)]) -> Option<NodeRef<'a>> {
        if !contract(self.is_element(), "descendant_by_path() requires an element node") {
            return None;
        }
        if !contract(!path.is_empty(), "descendant_by_path() requires a non-empty path") {
            return None;
        }
        let mut node = *self;
        for &(tag, index) in path {
            let children = node.children(false);
            let child = *children.get(index)?;
            if !child.is_element() || child.tag() != tag {
                return None;
            }
            node = child;
        }
        Some(node)
    }

    /// First direct child with the given tag whose class attribute
    /// equals `class_name`, compared case-insensitively as a whole
    /// string (single-class site convention, not token membership)
    pub fn child_by_class(&self, class_name: &str, tag: HtmlTag) -> Option<NodeRef<'a>> {
        if !contract(!class_name.is_empty(), "child_by_class() requires a non-empty class") {
            return None;
        }
        self.children(true)
            .into_iter()
            .find(|c| c.matches_class(class_name, tag))
    }

    /// All direct children matching class and tag
    pub fn children_by_class(&self, class_name: &str, tag: HtmlTag) -> Vec<NodeRef<'a>> {
        if !contract(!class_name.is_empty(), "children_by_class() requires a non-empty class") {
            return Vec::new();
        }
        self.children(true)
            .into_iter()
            .filter(|c| c.matches_class(class_name, tag))
            .collect()
    }

    /// All descendants matching class and tag, pre-order over the full
    /// subtree
    pub fn descendants_by_class(&self, class_name: &str, tag: HtmlTag) -> Vec<NodeRef<'a>> {
        if !contract(
            !class_name.is_empty(),
            "descendants_by_class() requires a non-empty class",
        ) {
            return Vec::new();
        }
        let mut result = Vec::new();
        self.collect_by_class(class_name, tag, &mut result);
        result
    }

    fn collect_by_class(&self, class_name: &str, tag: HtmlTag, out: &mut Vec<NodeRef<'a>>) {
        for child in self.children(true) {
            if child.matches_class(class_name, tag) {
                out.push(child);
            }
            child.collect_by_class(class_name, tag, out);
        }
    }

    fn matches_class(&self, class_name: &str, tag: HtmlTag) -> bool {
        self.tag() == tag
            && self
                .class_attribute()
                .is_some_and(|c| c.eq_ignore_ascii_case(class_name))
    }

    // ----- source diagnostics -----

    /// Byte offset range of the original opening tag in the source
    /// buffer; diagnostics only
    pub fn tag_source_span(&self) -> Option<Range<usize>> {
        if !contract(self.is_element(), "tag_source_span() requires an element node") {
            return None;
        }
        self.element().map(|e| e.span.clone())
    }

    /// Original opening-tag text
    pub fn raw_tag_html(&self) -> Option<&'a str> {
        if !contract(self.is_element(), "raw_tag_html() requires an element node") {
            return None;
        }
        self.element().map(|e| e.raw_tag.as_str())
    }
}

/// Derive a tag name from raw opening-tag source text, e.g.
/// `<x-widget a=b>` yields `x-widget`
fn tag_name_from_raw(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix('<')?;
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest.get(..end)
}
