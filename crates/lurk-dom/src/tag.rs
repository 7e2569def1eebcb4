//! Normalized HTML tag identifiers

/// Closed set of tag identifiers the query and serialization layers
/// classify. Tags outside the set parse as [`HtmlTag::Unknown`] and keep
/// their source spelling on the element node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HtmlTag {
    A,
    Abbr,
    Acronym,
    Area,
    B,
    Base,
    Basefont,
    Bdo,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Caption,
    Cite,
    Code,
    Col,
    Colgroup,
    Dd,
    Dfn,
    Div,
    Dl,
    Dt,
    Em,
    Embed,
    Font,
    Form,
    Frame,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Hr,
    Html,
    I,
    Iframe,
    Img,
    Input,
    Kbd,
    Keygen,
    Label,
    Li,
    Link,
    Menu,
    Meta,
    Nobr,
    Ol,
    Option,
    P,
    Param,
    Pre,
    S,
    Script,
    Select,
    Small,
    Source,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Sup,
    Table,
    Tbody,
    Td,
    Template,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Title,
    Tr,
    Track,
    Tt,
    Ul,
    Video,
    Wbr,
    Unknown,
}

impl HtmlTag {
    /// Map a lowercased tag name to its identifier
    pub fn from_name(name: &str) -> Self {
        match name {
            "a" => Self::A,
            "abbr" => Self::Abbr,
            "acronym" => Self::Acronym,
            "area" => Self::Area,
            "b" => Self::B,
            "base" => Self::Base,
            "basefont" => Self::Basefont,
            "bdo" => Self::Bdo,
            "big" => Self::Big,
            "blockquote" => Self::Blockquote,
            "body" => Self::Body,
            "br" => Self::Br,
            "button" => Self::Button,
            "caption" => Self::Caption,
            "cite" => Self::Cite,
            "code" => Self::Code,
            "col" => Self::Col,
            "colgroup" => Self::Colgroup,
            "dd" => Self::Dd,
            "dfn" => Self::Dfn,
            "div" => Self::Div,
            "dl" => Self::Dl,
            "dt" => Self::Dt,
            "em" => Self::Em,
            "embed" => Self::Embed,
            "font" => Self::Font,
            "form" => Self::Form,
            "frame" => Self::Frame,
            "h1" => Self::H1,
            "h2" => Self::H2,
            "h3" => Self::H3,
            "h4" => Self::H4,
            "h5" => Self::H5,
            "h6" => Self::H6,
            "head" => Self::Head,
            "hr" => Self::Hr,
            "html" => Self::Html,
            "i" => Self::I,
            "iframe" => Self::Iframe,
            "img" => Self::Img,
            "input" => Self::Input,
            "kbd" => Self::Kbd,
            "keygen" => Self::Keygen,
            "label" => Self::Label,
            "li" => Self::Li,
            "link" => Self::Link,
            "menu" => Self::Menu,
            "meta" => Self::Meta,
            "nobr" => Self::Nobr,
            "ol" => Self::Ol,
            "option" => Self::Option,
            "p" => Self::P,
            "param" => Self::Param,
            "pre" => Self::Pre,
            "s" => Self::S,
            "script" => Self::Script,
            "select" => Self::Select,
            "small" => Self::Small,
            "source" => Self::Source,
            "span" => Self::Span,
            "strike" => Self::Strike,
            "strong" => Self::Strong,
            "style" => Self::Style,
            "sub" => Self::Sub,
            "sup" => Self::Sup,
            "table" => Self::Table,
            "tbody" => Self::Tbody,
            "td" => Self::Td,
            "template" => Self::Template,
            "textarea" => Self::Textarea,
            "tfoot" => Self::Tfoot,
            "th" => Self::Th,
            "thead" => Self::Thead,
            "title" => Self::Title,
            "tr" => Self::Tr,
            "track" => Self::Track,
            "tt" => Self::Tt,
            "ul" => Self::Ul,
            "video" => Self::Video,
            "wbr" => Self::Wbr,
            _ => Self::Unknown,
        }
    }

    /// Normalized tag name; empty for [`HtmlTag::Unknown`]
    pub fn name(self) -> &'static str {
        match self {
            Self::A => "a",
            Self::Abbr => "abbr",
            Self::Acronym => "acronym",
            Self::Area => "area",
            Self::B => "b",
            Self::Base => "base",
            Self::Basefont => "basefont",
            Self::Bdo => "bdo",
            Self::Big => "big",
            Self::Blockquote => "blockquote",
            Self::Body => "body",
            Self::Br => "br",
            Self::Button => "button",
            Self::Caption => "caption",
            Self::Cite => "cite",
            Self::Code => "code",
            Self::Col => "col",
            Self::Colgroup => "colgroup",
            Self::Dd => "dd",
            Self::Dfn => "dfn",
            Self::Div => "div",
            Self::Dl => "dl",
            Self::Dt => "dt",
            Self::Em => "em",
            Self::Embed => "embed",
            Self::Font => "font",
            Self::Form => "form",
            Self::Frame => "frame",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::H5 => "h5",
            Self::H6 => "h6",
            Self::Head => "head",
            Self::Hr => "hr",
            Self::Html => "html",
            Self::I => "i",
            Self::Iframe => "iframe",
            Self::Img => "img",
            Self::Input => "input",
            Self::Kbd => "kbd",
            Self::Keygen => "keygen",
            Self::Label => "label",
            Self::Li => "li",
            Self::Link => "link",
            Self::Menu => "menu",
            Self::Meta => "meta",
            Self::Nobr => "nobr",
            Self::Ol => "ol",
            Self::Option => "option",
            Self::P => "p",
            Self::Param => "param",
            Self::Pre => "pre",
            Self::S => "s",
            Self::Script => "script",
            Self::Select => "select",
            Self::Small => "small",
            Self::Source => "source",
            Self::Span => "span",
            Self::Strike => "strike",
            Self::Strong => "strong",
            Self::Style => "style",
            Self::Sub => "sub",
            Self::Sup => "sup",
            Self::Table => "table",
            Self::Tbody => "tbody",
            Self::Td => "td",
            Self::Template => "template",
            Self::Textarea => "textarea",
            Self::Tfoot => "tfoot",
            Self::Th => "th",
            Self::Thead => "thead",
            Self::Title => "title",
            Self::Tr => "tr",
            Self::Track => "track",
            Self::Tt => "tt",
            Self::Ul => "ul",
            Self::Video => "video",
            Self::Wbr => "wbr",
            Self::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for name in ["a", "div", "span", "table", "textarea", "wbr"] {
            let tag = HtmlTag::from_name(name);
            assert_ne!(tag, HtmlTag::Unknown, "{name} should be known");
            assert_eq!(tag.name(), name);
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(HtmlTag::from_name("x-vendor-widget"), HtmlTag::Unknown);
        assert_eq!(HtmlTag::Unknown.name(), "");
    }
}
