//! Tree construction from the token stream
//!
//! Recovery-oriented: mismatched end tags are skipped, unclosed elements
//! are closed at end of input, and an `html`/`head`/`body` skeleton is
//! synthesized when the source does not provide one. Whitespace-only
//! character runs become Whitespace nodes, everything else Text.

use crate::tags;
use crate::tokenizer::Token;
use lurk_dom::{Attribute, Doctype, Document, DomTree, ElementData, HtmlTag, NodeData, NodeId};
use std::ops::Range;

pub(crate) struct TreeBuilder {
    tree: DomTree,
    doc_node: NodeId,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    /// Open elements; `html` at the bottom once it exists
    stack: Vec<NodeId>,
    in_body: bool,
    doctype: Option<Doctype>,
}

/// Start tags seen on the stack top that an incoming same-tag start
/// implicitly closes
const SELF_NESTING: &[HtmlTag] = &[
    HtmlTag::Li,
    HtmlTag::Option,
    HtmlTag::Tr,
    HtmlTag::Td,
    HtmlTag::Th,
    HtmlTag::Dd,
    HtmlTag::Dt,
    HtmlTag::P,
];

/// Block-level starts that implicitly close an open `<p>`
const CLOSES_P: &[HtmlTag] = &[
    HtmlTag::P,
    HtmlTag::Div,
    HtmlTag::Ul,
    HtmlTag::Ol,
    HtmlTag::Li,
    HtmlTag::Table,
    HtmlTag::Blockquote,
    HtmlTag::Pre,
    HtmlTag::Form,
    HtmlTag::Hr,
    HtmlTag::H1,
    HtmlTag::H2,
    HtmlTag::H3,
    HtmlTag::H4,
    HtmlTag::H5,
    HtmlTag::H6,
    HtmlTag::Dl,
    HtmlTag::Dd,
    HtmlTag::Dt,
];

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        let mut tree = DomTree::new();
        let doc_node = tree.create(NodeData::Document);
        Self {
            tree,
            doc_node,
            html: NodeId::NONE,
            head: NodeId::NONE,
            body: NodeId::NONE,
            stack: Vec::new(),
            in_body: false,
            doctype: None,
        }
    }

    pub(crate) fn process(&mut self, token: Token) {
        match token {
            Token::Doctype(d) => {
                if self.doctype.is_none() && !self.html.is_valid() {
                    self.doctype = Some(d);
                }
            }
            Token::StartTag {
                name,
                attrs,
                self_closing,
                span,
                raw,
            } => self.start_tag(name, attrs, self_closing, span, raw),
            Token::EndTag { name } => self.end_tag(&name),
            Token::Text(text) => self.character_data(text),
            Token::Comment(text) => {
                let id = self.tree.create(NodeData::Comment(text));
                let parent = self.insertion_parent();
                self.tree.append_child(parent, id);
            }
            Token::CData(text) => {
                if !self.in_body && !self.in_raw_text_element() {
                    self.ensure_body();
                }
                let id = self.tree.create(NodeData::CData(text));
                let parent = self.insertion_parent();
                self.tree.append_child(parent, id);
            }
        }
    }

    /// Close remaining open elements and hand the finished tree over
    pub(crate) fn finish(mut self, raw_html: String) -> Option<Document> {
        self.stack.clear();
        if !self.html.is_valid() {
            return None;
        }
        Some(Document::new(
            raw_html,
            self.tree,
            self.doctype,
            self.doc_node,
            self.html,
        ))
    }

    fn start_tag(
        &mut self,
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
        span: Range<usize>,
        raw: String,
    ) {
        let tag = HtmlTag::from_name(&name);
        match tag {
            HtmlTag::Html => {
                if !self.html.is_valid() {
                    let id = self.create_element(tag, name, attrs, span, raw);
                    self.tree.append_child(self.doc_node, id);
                    self.html = id;
                    self.stack.push(id);
                }
                // duplicate <html> is dropped
            }
            HtmlTag::Head => {
                self.ensure_html();
                if !self.head.is_valid() {
                    let id = self.create_element(tag, name, attrs, span, raw);
                    self.tree.append_child(self.html, id);
                    self.head = id;
                }
            }
            HtmlTag::Body => {
                if !self.in_body {
                    self.ensure_html();
                    self.ensure_head_exists();
                    self.stack.truncate(1);
                    if !self.body.is_valid() {
                        let id = self.create_element(tag, name, attrs, span, raw);
                        self.tree.append_child(self.html, id);
                        self.body = id;
                    }
                    self.stack.push(self.body);
                    self.in_body = true;
                }
            }
            _ => {
                let is_head_content = !self.in_body && tags::HEAD_CONTENT.contains(&name.as_str());
                let parent = if is_head_content {
                    self.ensure_head_exists();
                    self.head
                } else {
                    if !self.in_body {
                        self.ensure_body();
                    }
                    self.pop_implied_end_tags(tag);
                    self.insertion_parent()
                };

                let is_void = tags::is_void(&name);
                let id = self.create_element(tag, name, attrs, span, raw);
                self.tree.append_child(parent, id);
                // '/>' on a non-void element is ignored, as in HTML5
                if !is_void {
                    self.stack.push(id);
                }
                let _ = self_closing;
            }
        }
    }

    fn end_tag(&mut self, name: &str) {
        // </html> and </body> are ignored; trailing content still
        // belongs to the body
        if matches!(name, "html" | "body" | "head") {
            return;
        }
        let found = self
            .stack
            .iter()
            .rposition(|&id| self.element_name(id) == Some(name));
        match found {
            // never pop the root
            Some(idx) if idx > 0 => self.stack.truncate(idx),
            _ => {} // stray end tag, skipped
        }
    }

    fn character_data(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let is_ws = text.chars().all(|c| c.is_ascii_whitespace());
        if self.in_raw_text_element() {
            let data = if is_ws {
                NodeData::Whitespace(text)
            } else {
                NodeData::Text(text)
            };
            let id = self.tree.create(data);
            let parent = self.insertion_parent();
            self.tree.append_child(parent, id);
            return;
        }
        if is_ws {
            // whitespace before any real content is dropped
            if !self.in_body {
                return;
            }
            let id = self.tree.create(NodeData::Whitespace(text));
            let parent = self.insertion_parent();
            self.tree.append_child(parent, id);
            return;
        }
        if !self.in_body {
            self.ensure_body();
        }
        let id = self.tree.create(NodeData::Text(text));
        let parent = self.insertion_parent();
        self.tree.append_child(parent, id);
    }

    // ----- helpers -----

    fn create_element(
        &mut self,
        tag: HtmlTag,
        name: String,
        attrs: Vec<Attribute>,
        span: Range<usize>,
        raw_tag: String,
    ) -> NodeId {
        let data = ElementData {
            tag,
            name,
            attrs,
            span,
            raw_tag,
        };
        if tag == HtmlTag::Template {
            self.tree.create(NodeData::Template(data))
        } else {
            self.tree.create(NodeData::Element(data))
        }
    }

    fn synthetic_element(&mut self, tag: HtmlTag) -> NodeId {
        self.create_element(tag, tag.name().to_string(), Vec::new(), 0..0, String::new())
    }

    fn ensure_html(&mut self) {
        if !self.html.is_valid() {
            let id = self.synthetic_element(HtmlTag::Html);
            self.tree.append_child(self.doc_node, id);
            self.html = id;
            self.stack.push(id);
        }
    }

    fn ensure_head_exists(&mut self) {
        self.ensure_html();
        if !self.head.is_valid() {
            let id = self.synthetic_element(HtmlTag::Head);
            self.tree.append_child(self.html, id);
            self.head = id;
        }
    }

    fn ensure_body(&mut self) {
        self.ensure_html();
        self.ensure_head_exists();
        if !self.body.is_valid() {
            self.stack.truncate(1);
            let id = self.synthetic_element(HtmlTag::Body);
            self.tree.append_child(self.html, id);
            self.body = id;
            self.stack.push(id);
        } else if !self.stack.contains(&self.body) {
            self.stack.truncate(1);
            self.stack.push(self.body);
        }
        self.in_body = true;
    }

    fn insertion_parent(&self) -> NodeId {
        match self.stack.last() {
            Some(&id) => id,
            None => self.doc_node,
        }
    }

    fn element_name(&self, id: NodeId) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.name.as_str())
    }

    fn element_tag(&self, id: NodeId) -> Option<HtmlTag> {
        self.tree.get(id).and_then(|n| n.as_element()).map(|e| e.tag)
    }

    fn in_raw_text_element(&self) -> bool {
        self.stack
            .last()
            .and_then(|&id| self.element_name(id))
            .is_some_and(tags::is_raw_text)
    }

    /// Close elements an incoming start tag implicitly terminates
    fn pop_implied_end_tags(&mut self, incoming: HtmlTag) {
        // keep html and body on the stack
        while self.stack.len() > 2 {
            let top = match self.stack.last().and_then(|&id| self.element_tag(id)) {
                Some(t) => t,
                None => break,
            };
            let same_tag_nesting = top == incoming && SELF_NESTING.contains(&incoming);
            let p_closed_by_block = top == HtmlTag::P && CLOSES_P.contains(&incoming);
            let cell_closed_by_cell = matches!(top, HtmlTag::Td | HtmlTag::Th)
                && matches!(incoming, HtmlTag::Td | HtmlTag::Th);
            if same_tag_nesting || p_closed_by_block || cell_closed_by_cell {
                self.stack.pop();
            } else {
                break;
            }
        }
    }
}
