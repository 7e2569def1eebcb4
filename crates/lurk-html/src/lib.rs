//! lurk HTML - permissive parser and pretty-printer
//!
//! Parses real-world forum markup into a [`lurk_dom::Document`] without
//! ever rejecting malformed input: unclosed tags are closed, stray end
//! tags skipped, and a missing `html`/`head`/`body` skeleton synthesized.
//! The only parse failure is input that produces no tree at all.
//!
//! [`prettify`] serializes a document back to consistently indented
//! markup; prettified output reparses to the same prettified form.

mod prettify;
mod tags;
mod tokenizer;
mod tree_builder;

pub use lurk_dom::{
    Attribute, Doctype, Document, HtmlTag, Node, NodeData, NodeId, NodeKind, NodeRef,
};
pub use prettify::{prettify, prettify_node};

use tokenizer::{Token, Tokenizer};
use tree_builder::TreeBuilder;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The input contained nothing a tree could be built from
    #[error("parser produced no output")]
    Empty,
}

/// Parse an HTML string into a document.
///
/// Never fails on malformed markup; returns [`ParseError::Empty`] only
/// when the input is empty or whitespace/comments all the way down.
pub fn parse_document(raw: &str) -> Result<Document, ParseError> {
    let input = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut tokenizer = Tokenizer::new(input);
    let mut builder = TreeBuilder::new();
    while let Some(token) = tokenizer.next_token() {
        // a raw-text start tag switches the tokenizer mode until the
        // matching end tag
        let raw_text = match &token {
            Token::StartTag {
                name, self_closing, ..
            } if tags::is_raw_text(name) && !self_closing => {
                Some((name.clone(), tags::raw_text_decodes_entities(name)))
            }
            _ => None,
        };
        builder.process(token);
        if let Some((name, decode)) = raw_text {
            tokenizer.enter_raw_text(&name, decode);
        }
    }
    builder.finish(input.to_string()).ok_or(ParseError::Empty)
}

/// Parse raw page bytes, handling byte-order marks and non-UTF-8 input.
///
/// UTF-16 (either endianness, BOM-marked) is decoded; everything else is
/// treated as UTF-8 with invalid sequences replaced. A `<meta charset>`
/// declaring some other encoding is logged and otherwise ignored.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    let text = decode_page_bytes(bytes);
    warn_on_foreign_charset(&text);
    parse_document(&text)
}

fn decode_page_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[..2] == [0xFF, 0xFE] {
        return decode_utf16_bytes(&bytes[2..], u16::from_le_bytes);
    }
    if bytes.len() >= 2 && bytes[..2] == [0xFE, 0xFF] {
        return decode_utf16_bytes(&bytes[2..], u16::from_be_bytes);
    }
    let rest = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(rest).into_owned()
}

fn decode_utf16_bytes(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| combine([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Best-effort sniff of a `charset=` declaration in the document head
fn warn_on_foreign_charset(text: &str) {
    let head: String = text.chars().take(1024).collect::<String>().to_lowercase();
    let Some(pos) = head.find("charset") else {
        return;
    };
    let after = &head[pos + "charset".len()..];
    let value: String = after
        .trim_start_matches([' ', '=', '"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if !value.is_empty() && value != "utf-8" && value != "utf8" {
        tracing::warn!(charset = %value, "page declares a non-UTF-8 charset, decoding as UTF-8 anyway");
    }
}
