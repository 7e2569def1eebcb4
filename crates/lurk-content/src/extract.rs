//! Site-specific page extraction seam

use crate::post::PostList;

/// Why a downloaded page could not be turned into content
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The page markup could not be parsed at all
    #[error("page markup unparsable: {0}")]
    Parse(String),
    /// Parsed fine, but the pagination block is missing or unreadable
    #[error("page count not found in page")]
    MissingPageCount,
    /// A post block lacks its author section
    #[error("post author block not found")]
    MissingAuthor,
    /// The page has no recognizable post blocks
    #[error("no post blocks found in page")]
    MissingPostBlock,
    /// A recognized block had content the extractor cannot interpret
    #[error("malformed {section} block: {detail}")]
    Malformed {
        section: &'static str,
        detail: String,
    },
}

/// Parses one forum engine's page markup into the content model.
///
/// Implementations receive the raw downloaded bytes so they control
/// decoding. They must be thread-safe: the cache calls them from
/// whatever thread requested the page.
pub trait PageExtractor: Send + Sync {
    /// Total number of pages in the thread, read from a thread page's
    /// pagination block
    fn extract_page_count(&self, page: &[u8]) -> Result<u32, ExtractError>;

    /// All posts on one thread page, in page order
    fn extract_page_posts(&self, page: &[u8]) -> Result<PostList, ExtractError>;
}
