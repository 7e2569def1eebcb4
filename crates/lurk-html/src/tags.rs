//! Tag classification sets shared by the tree builder and the
//! pretty-printer

/// Rendered without surrounding indentation/newlines
pub(crate) const NONBREAKING_INLINE: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdo", "big", "cite", "code", "dfn", "em", "font", "i", "img",
    "kbd", "nobr", "s", "small", "span", "strike", "strong", "sub", "sup", "tt",
];

/// Void tags: no children, self-closing in output
pub(crate) const EMPTY_TAGS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "command", "col", "embed", "event-source",
    "frame", "hr", "image", "img", "input", "keygen", "link", "menuitem", "meta", "param",
    "source", "spacer", "track", "wbr",
];

/// Children serialized verbatim, no trimming
pub(crate) const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "script", "style"];

/// Document-structure tags with trailing-newline normalization
pub(crate) const SPECIAL_HANDLING: &[&str] = &["html", "body"];

/// Text children are not XML-entity-escaped
pub(crate) const NO_ENTITY_SUB: &[&str] = &["script", "style"];

/// Structurally a block, formatted without the blank-line separation
pub(crate) const TREAT_LIKE_INLINE: &[&str] = &["p"];

/// Elements whose content is tokenized as literal text up to the
/// matching close tag. Entities are decoded in textarea/title (RCDATA)
/// but not in script/style.
pub(crate) const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title"];

/// Tags that belong in `<head>` when seen before body content
pub(crate) const HEAD_CONTENT: &[&str] =
    &["base", "basefont", "link", "meta", "title", "style", "script"];

pub(crate) fn is_inline(name: &str) -> bool {
    NONBREAKING_INLINE.contains(&name)
}

pub(crate) fn is_void(name: &str) -> bool {
    EMPTY_TAGS.contains(&name)
}

pub(crate) fn is_raw_text(name: &str) -> bool {
    RAW_TEXT.contains(&name)
}

/// Whether raw text content of `name` gets entity decoding
pub(crate) fn raw_text_decodes_entities(name: &str) -> bool {
    matches!(name, "textarea" | "title")
}
