//! HTML pretty-printer
//!
//! Serializes a parsed tree back to formatted markup, 2-space indent per
//! depth level, driven by the tag classification sets in [`crate::tags`].
//! The output is a fixed point: prettifying a reparse of prettified
//! output reproduces it byte for byte.

use crate::tags;
use lurk_dom::{Attribute, Document, Node, NodeData, NodeId};

const INDENT: &str = "  ";
const TRIM: &[char] = &[' ', '\n', '\r', '\t'];

/// Pretty-print a whole document, starting from the document node.
/// Emits the DOCTYPE declaration line when the source carried one.
pub fn prettify(doc: &Document) -> String {
    prettyprint(doc, doc.document_node().id(), 0)
}

/// Pretty-print a subtree; the given node comes out at indentation zero
pub fn prettify_node(doc: &Document, id: NodeId) -> String {
    prettyprint(doc, id, 1)
}

fn display_name(node: &Node) -> &str {
    match &node.data {
        NodeData::Document => "document",
        NodeData::Element(e) | NodeData::Template(e) => &e.name,
        _ => "",
    }
}

fn prettyprint(doc: &Document, id: NodeId, lvl: usize) -> String {
    let Some(node) = doc.tree().get(id) else {
        return String::new();
    };

    match &node.data {
        NodeData::Document => {
            let mut results = build_doctype(doc);
            results.push_str(&prettyprint_contents(doc, id, lvl + 1));
            return results;
        }
        NodeData::Text(t) | NodeData::CData(t) => return substitute_text_entities(t),
        NodeData::Whitespace(t) => return t.clone(),
        NodeData::Comment(_) => return String::new(),
        NodeData::Element(_) | NodeData::Template(_) => {}
    }

    let tagname = display_name(node).to_string();
    let need_special_handling = tags::SPECIAL_HANDLING.contains(&tagname.as_str());
    let is_empty_tag = tags::is_void(&tagname);
    let no_entity_substitution = tags::NO_ENTITY_SUB.contains(&tagname.as_str());
    let keep_whitespace = tags::PRESERVE_WHITESPACE.contains(&tagname.as_str());
    let is_inline = tags::is_inline(&tagname);
    let inline_like = tags::TREAT_LIKE_INLINE.contains(&tagname.as_str());
    let pp_okay = !is_inline && !keep_whitespace;

    let mut atts = String::new();
    if let Some(elem) = node.as_element() {
        for attr in &elem.attrs {
            atts.push_str(&build_attribute(attr, no_entity_substitution));
        }
    }

    let (close, close_tag) = if is_empty_tag {
        ("/", String::new())
    } else {
        ("", format!("</{tagname}>"))
    };

    let indent_space = INDENT.repeat(lvl.saturating_sub(1));

    let mut contents = prettyprint_contents(doc, id, lvl + 1);

    if need_special_handling {
        let trimmed = contents.trim_end_matches(TRIM).to_string();
        contents = trimmed;
        contents.push('\n');
    }

    let last_char = contents.chars().last().unwrap_or(' ');

    let mut results = String::new();
    if pp_okay {
        results.push_str(&indent_space);
    }
    results.push('<');
    results.push_str(&tagname);
    results.push_str(&atts);
    results.push_str(close);
    results.push('>');
    if pp_okay && !inline_like {
        results.push('\n');
    }
    if inline_like {
        contents = contents.trim_start_matches(TRIM).to_string();
    }
    results.push_str(&contents);
    if pp_okay && !contents.is_empty() && last_char != '\n' && !inline_like {
        results.push('\n');
    }
    if pp_okay && !inline_like && !close_tag.is_empty() {
        results.push_str(&indent_space);
    }
    results.push_str(&close_tag);
    if pp_okay && !close_tag.is_empty() {
        results.push('\n');
    }

    results
}

fn prettyprint_contents(doc: &Document, id: NodeId, lvl: usize) -> String {
    let Some(node) = doc.tree().get(id) else {
        return String::new();
    };
    let tagname = display_name(node);
    let no_entity_substitution = tags::NO_ENTITY_SUB.contains(&tagname);
    let keep_whitespace = tags::PRESERVE_WHITESPACE.contains(&tagname);
    let is_inline = tags::is_inline(tagname);
    let pp_okay = !is_inline && !keep_whitespace;

    let mut contents = String::new();
    for &child_id in doc.tree().children(id) {
        let Some(child) = doc.tree().get(child_id) else {
            continue;
        };
        match &child.data {
            NodeData::Text(t) | NodeData::CData(t) => {
                let mut val = if no_entity_substitution {
                    t.clone()
                } else {
                    substitute_text_entities(t)
                };
                if pp_okay {
                    val = val.trim_matches(TRIM).to_string();
                }
                if pp_okay && contents.is_empty() && !val.is_empty() {
                    contents.push_str(&INDENT.repeat(lvl.saturating_sub(1)));
                }
                contents.push_str(&val);
            }
            NodeData::Element(_) | NodeData::Template(_) => {
                let val = prettyprint(doc, child_id, lvl);
                let child_inline = tags::is_inline(display_name(child));
                if child_inline && !contents.is_empty() {
                    contents.push_str(val.trim_start_matches(TRIM));
                } else {
                    if child_inline && pp_okay {
                        contents.push_str(&INDENT.repeat(lvl.saturating_sub(1)));
                    }
                    contents.push_str(&val);
                }
            }
            NodeData::Whitespace(t) => {
                if keep_whitespace || is_inline {
                    contents.push_str(t);
                }
            }
            NodeData::Comment(_) | NodeData::Document => {}
        }
    }
    contents
}

fn build_doctype(doc: &Document) -> String {
    let mut results = String::new();
    if let Some(d) = doc.doctype() {
        results.push_str("<!DOCTYPE ");
        results.push_str(&d.name);
        if let Some(public_id) = d.public_id.as_deref().filter(|p| !p.is_empty()) {
            results.push_str(" PUBLIC \"");
            results.push_str(public_id);
            results.push_str("\" \"");
            results.push_str(d.system_id.as_deref().unwrap_or(""));
            results.push('"');
        }
        results.push_str(">\n");
    }
    results
}

/// Re-emit one attribute, preserving its original quote character.
/// `=value` is omitted only for an empty value that had no quote at all
/// in the source, so boolean attributes round-trip as bare names.
fn build_attribute(attr: &Attribute, no_entities: bool) -> String {
    let mut atts = String::new();
    atts.push(' ');
    atts.push_str(&attr.name);

    if !attr.value.is_empty() || attr.quote.is_some() {
        let qs = match attr.quote {
            Some('"') => "\"",
            Some('\'') => "'",
            _ => "",
        };
        atts.push('=');
        atts.push_str(qs);
        if no_entities {
            atts.push_str(&attr.value);
        } else {
            atts.push_str(&substitute_attribute_entities(attr.quote, &attr.value));
        }
        atts.push_str(qs);
    }
    atts
}

/// `&` must be replaced first
fn substitute_text_entities(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn substitute_attribute_entities(quote: Option<char>, text: &str) -> String {
    let result = substitute_text_entities(text);
    match quote {
        Some('"') => result.replace('"', "&quot;"),
        Some('\'') => result.replace('\'', "&apos;"),
        _ => result,
    }
}
