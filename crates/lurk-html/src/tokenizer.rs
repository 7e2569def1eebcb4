//! Permissive HTML tokenizer
//!
//! Byte-position state machine over a UTF-8 buffer. Unlike a
//! spec-complete tokenizer it records the source facts the serializer
//! needs for faithful round-trips: the byte span and raw text of every
//! opening tag and the original quote character of every attribute.
//! Nothing is ever rejected; unterminated constructs are closed at EOF.

use lurk_dom::{Attribute, Doctype};
use std::collections::VecDeque;
use std::ops::Range;

/// One tokenizer output
#[derive(Debug)]
pub(crate) enum Token {
    Doctype(Doctype),
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
        span: Range<usize>,
        raw: String,
    },
    EndTag {
        name: String,
    },
    /// Character data between tags, entities decoded
    Text(String),
    Comment(String),
    CData(String),
}

pub(crate) struct Tokenizer<'s> {
    input: &'s str,
    bytes: &'s [u8],
    pos: usize,
    pending: VecDeque<Token>,
    /// Set while inside a raw-text element: (element name, decode entities)
    raw_text: Option<(String, bool)>,
}

impl<'s> Tokenizer<'s> {
    pub(crate) fn new(input: &'s str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            pending: VecDeque::new(),
            raw_text: None,
        }
    }

    /// Switch to raw-text mode until `</name>` is seen
    pub(crate) fn enter_raw_text(&mut self, name: &str, decode: bool) {
        self.raw_text = Some((name.to_string(), decode));
    }

    pub(crate) fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(tok) = self.pending.pop_front() {
                return Some(tok);
            }
            if self.pos >= self.bytes.len() {
                return None;
            }
            if let Some((name, decode)) = self.raw_text.take() {
                return Some(self.raw_text_run(&name, decode));
            }
            if let Some(tok) = self.step() {
                return Some(tok);
            }
            // step() consumed input without producing a token (bogus
            // comment, empty end tag); keep going
        }
    }

    fn step(&mut self) -> Option<Token> {
        let b = self.bytes[self.pos];
        if b != b'<' || self.pos + 1 >= self.bytes.len() {
            return Some(self.text_run());
        }
        match self.bytes[self.pos + 1] {
            b'/' => self.end_tag(),
            b'!' => self.markup_declaration(),
            b'?' => {
                self.skip_past_gt(self.pos + 2);
                None
            }
            c if c.is_ascii_alphabetic() => Some(self.start_tag()),
            // stray '<' begins character data
            _ => Some(self.text_run()),
        }
    }

    /// Character data up to the next '<'
    fn text_run(&mut self) -> Token {
        let start = self.pos;
        let mut i = self.pos + 1;
        while i < self.bytes.len() && self.bytes[i] != b'<' {
            i += 1;
        }
        self.pos = i;
        Token::Text(decode_entities(&self.input[start..i]))
    }

    /// Literal text up to the matching `</name>` close tag
    fn raw_text_run(&mut self, name: &str, decode: bool) -> Token {
        let start = self.pos;
        let mut i = self.pos;
        let close = loop {
            match self.find_lt(i) {
                Some(lt) => {
                    if self.is_close_tag_at(lt, name) {
                        break Some(lt);
                    }
                    i = lt + 1;
                }
                None => break None,
            }
        };
        let end = close.unwrap_or(self.bytes.len());
        let text = &self.input[start..end];
        let token = if decode {
            Token::Text(decode_entities(text))
        } else {
            Token::Text(text.to_string())
        };
        match close {
            Some(lt) => {
                self.skip_past_gt(lt);
                if text.is_empty() {
                    return Token::EndTag {
                        name: name.to_string(),
                    };
                }
                self.pending.push_back(Token::EndTag {
                    name: name.to_string(),
                });
            }
            None => self.pos = self.bytes.len(),
        }
        token
    }

    fn find_lt(&self, from: usize) -> Option<usize> {
        self.bytes[from..]
            .iter()
            .position(|&b| b == b'<')
            .map(|off| from + off)
    }

    fn is_close_tag_at(&self, lt: usize, name: &str) -> bool {
        let after = lt + 2 + name.len();
        if lt + 1 >= self.bytes.len() || self.bytes[lt + 1] != b'/' || after > self.bytes.len() {
            return false;
        }
        if !self.bytes[lt + 2..after].eq_ignore_ascii_case(name.as_bytes()) {
            return false;
        }
        match self.bytes.get(after) {
            Some(&b) => b == b'>' || b == b'/' || b.is_ascii_whitespace(),
            None => true,
        }
    }

    fn end_tag(&mut self) -> Option<Token> {
        let mut i = self.pos + 2;
        let mut name = String::new();
        while i < self.bytes.len() && is_tag_name_byte(self.bytes[i]) {
            name.push(self.bytes[i].to_ascii_lowercase() as char);
            i += 1;
        }
        self.skip_past_gt(i);
        if name.is_empty() {
            return None;
        }
        Some(Token::EndTag { name })
    }

    fn markup_declaration(&mut self) -> Option<Token> {
        let rest = &self.input[self.pos + 2..];
        if let Some(body) = rest.strip_prefix("--") {
            let start = self.pos + 4;
            match body.find("-->") {
                Some(off) => {
                    self.pos = start + off + 3;
                    Some(Token::Comment(self.input[start..start + off].to_string()))
                }
                None => {
                    self.pos = self.bytes.len();
                    Some(Token::Comment(self.input[start..].to_string()))
                }
            }
        } else if let Some(body) = rest.strip_prefix("[CDATA[") {
            let start = self.pos + 9;
            match body.find("]]>") {
                Some(off) => {
                    self.pos = start + off + 3;
                    Some(Token::CData(self.input[start..start + off].to_string()))
                }
                None => {
                    self.pos = self.bytes.len();
                    Some(Token::CData(self.input[start..].to_string()))
                }
            }
        } else if starts_with_ignore_case(rest, b"doctype") {
            let inner_start = self.pos + 2 + 7;
            let end = self.find_gt(inner_start);
            let inner = &self.input[inner_start..end];
            self.pos = (end + 1).min(self.bytes.len());
            Some(Token::Doctype(parse_doctype(inner)))
        } else {
            self.skip_past_gt(self.pos + 2);
            None
        }
    }

    fn start_tag(&mut self) -> Token {
        let start = self.pos;
        let mut i = self.pos + 1;
        let mut name = String::new();
        while i < self.bytes.len() && is_tag_name_byte(self.bytes[i]) {
            name.push(self.bytes[i].to_ascii_lowercase() as char);
            i += 1;
        }

        let mut attrs: Vec<Attribute> = Vec::new();
        let mut self_closing = false;
        loop {
            while i < self.bytes.len() && self.bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= self.bytes.len() {
                break;
            }
            match self.bytes[i] {
                b'>' => {
                    i += 1;
                    break;
                }
                b'/' => {
                    if self.bytes.get(i + 1) == Some(&b'>') {
                        self_closing = true;
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                _ => {
                    let (attr, next) = self.attribute(i);
                    if let Some(attr) = attr {
                        attrs.push(attr);
                    }
                    i = next;
                }
            }
        }

        self.pos = i;
        Token::StartTag {
            name,
            attrs,
            self_closing,
            span: start..i,
            raw: self.input[start..i].to_string(),
        }
    }

    /// Parse one attribute starting at a non-whitespace byte; returns the
    /// attribute (if a name was present) and the position to resume at
    fn attribute(&self, mut i: usize) -> (Option<Attribute>, usize) {
        let name_start = i;
        while i < self.bytes.len() {
            let b = self.bytes[i];
            if b.is_ascii_whitespace() || b == b'=' || b == b'/' || b == b'>' {
                break;
            }
            i += 1;
        }
        if i == name_start {
            // lone stray byte, step over it
            return (None, i + 1);
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < self.bytes.len() && self.bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if self.bytes.get(j) != Some(&b'=') {
            // bare boolean attribute
            return (
                Some(Attribute {
                    name,
                    value: String::new(),
                    quote: None,
                }),
                i,
            );
        }
        j += 1;
        while j < self.bytes.len() && self.bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        match self.bytes.get(j).copied() {
            Some(q) if q == b'"' || q == b'\'' => {
                let value_start = j + 1;
                let mut k = value_start;
                while k < self.bytes.len() && self.bytes[k] != q {
                    k += 1;
                }
                let value = decode_entities(&self.input[value_start..k]);
                let next = (k + 1).min(self.bytes.len());
                (
                    Some(Attribute {
                        name,
                        value,
                        quote: Some(q as char),
                    }),
                    next,
                )
            }
            Some(_) => {
                let value_start = j;
                let mut k = j;
                while k < self.bytes.len()
                    && !self.bytes[k].is_ascii_whitespace()
                    && self.bytes[k] != b'>'
                {
                    k += 1;
                }
                let value = decode_entities(&self.input[value_start..k]);
                (
                    Some(Attribute {
                        name,
                        value,
                        quote: None,
                    }),
                    k,
                )
            }
            None => (
                Some(Attribute {
                    name,
                    value: String::new(),
                    quote: None,
                }),
                j,
            ),
        }
    }

    fn find_gt(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.bytes.len() && self.bytes[i] != b'>' {
            i += 1;
        }
        i
    }

    fn skip_past_gt(&mut self, from: usize) {
        self.pos = (self.find_gt(from) + 1).min(self.bytes.len());
    }
}

fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Byte-wise prefix check. Prefixes are ASCII keywords, so comparing on
/// bytes never lands inside a multibyte character of `s`.
fn starts_with_ignore_case(s: &str, prefix: &[u8]) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Parse the inside of a `<!DOCTYPE ...>` declaration
fn parse_doctype(inner: &str) -> Doctype {
    let inner = inner.trim();
    let (name, rest) = match inner.find(|c: char| c.is_ascii_whitespace()) {
        Some(pos) => (&inner[..pos], inner[pos..].trim_start()),
        None => (inner, ""),
    };
    let mut doctype = Doctype {
        name: name.to_string(),
        public_id: None,
        system_id: None,
    };
    if starts_with_ignore_case(rest, b"public") {
        let mut ids = quoted_strings(&rest[6..]);
        doctype.public_id = ids.next();
        doctype.system_id = ids.next();
    } else if starts_with_ignore_case(rest, b"system") {
        doctype.system_id = quoted_strings(&rest[6..]).next();
    }
    doctype
}

/// Iterate over `"..."` / `'...'` quoted strings in a declaration tail
fn quoted_strings(s: &str) -> impl Iterator<Item = String> + '_ {
    let mut rest = s;
    std::iter::from_fn(move || {
        let open = rest.find(['"', '\''])?;
        let quote = rest.as_bytes()[open] as char;
        let body = &rest[open + 1..];
        let close = body.find(quote)?;
        let out = body[..close].to_string();
        rest = &body[close + 1..];
        Some(out)
    })
}

/// Decode the common named entities and numeric character references.
/// Unknown references pass through literally.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one_entity(tail) {
            Some((ch, consumed)) => {
                out.push_str(&ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decode a single reference at the start of `s` (which begins with '&');
/// returns the replacement and the number of bytes consumed
fn decode_one_entity(s: &str) -> Option<(String, usize)> {
    let semi = s.find(';')?;
    if semi < 2 || semi > 10 {
        return None;
    }
    let body = &s[1..semi];
    let decoded = match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = body.strip_prefix('#').and_then(|num| {
                if let Some(hex) = num.strip_prefix(['x', 'X']) {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    num.parse::<u32>().ok()
                }
            })?;
            char::from_u32(code)
        }
    };
    decoded.map(|c| (c.to_string(), semi + 1))
}
