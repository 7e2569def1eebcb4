//! Rich-text fragments of a post body

/// Reference to an embedded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    /// Declared pixel size, when the markup carries one
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
        }
    }

    /// Approximate heap footprint in bytes
    pub fn approx_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.url.capacity()
    }
}

/// One piece of a post body, in display order.
///
/// Quote and spoiler blocks nest: their bodies are fragment lists of
/// their own.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Decoded text with no markup left in it
    PlainText(String),
    /// Text that kept inline formatting markup
    RichText(String),
    LineBreak,
    Hyperlink { url: String, title: String },
    Image(ImageRef),
    Video { url: String },
    Quote {
        title: String,
        author: String,
        source_url: Option<String>,
        body: Vec<Fragment>,
    },
    Spoiler { title: String, body: Vec<Fragment> },
}

impl Fragment {
    /// Approximate heap footprint in bytes, recursing into nested blocks
    pub fn approx_size(&self) -> usize {
        let heap = match self {
            Fragment::PlainText(t) | Fragment::RichText(t) => t.capacity(),
            Fragment::LineBreak => 0,
            Fragment::Hyperlink { url, title } => url.capacity() + title.capacity(),
            Fragment::Image(img) => img.url.capacity(),
            Fragment::Video { url } => url.capacity(),
            Fragment::Quote {
                title,
                author,
                source_url,
                body,
            } => {
                title.capacity()
                    + author.capacity()
                    + source_url.as_ref().map(|u| u.capacity()).unwrap_or(0)
                    + body.iter().map(Fragment::approx_size).sum::<usize>()
            }
            Fragment::Spoiler { title, body } => {
                title.capacity() + body.iter().map(Fragment::approx_size).sum::<usize>()
            }
        };
        std::mem::size_of::<Self>() + heap
    }

    /// Plain-text rendering, markup and structure dropped
    pub fn to_plain_text(&self) -> String {
        match self {
            Fragment::PlainText(t) | Fragment::RichText(t) => t.clone(),
            Fragment::LineBreak => "\n".to_string(),
            Fragment::Hyperlink { title, url } => {
                if title.is_empty() {
                    url.clone()
                } else {
                    title.clone()
                }
            }
            Fragment::Image(_) | Fragment::Video { .. } => String::new(),
            Fragment::Quote { body, .. } | Fragment::Spoiler { body, .. } => {
                body.iter().map(Fragment::to_plain_text).collect()
            }
        }
    }
}
