//! Download seam and progress reporting

use crate::ThreadId;

/// A page download failed
#[derive(Debug, Clone, thiserror::Error)]
#[error("failed to download page {page} of thread {thread}: {reason}")]
pub struct FetchError {
    pub thread: ThreadId,
    pub page: u32,
    pub reason: String,
}

/// Downloads raw thread-page bytes.
///
/// `progress` receives (received, total) byte counts as the transfer
/// advances; `total` is 0 when the size is unknown. Implementations must
/// be thread-safe: the cache calls them from whatever thread asked for
/// the page, and distinct pages may download concurrently.
pub trait PageFetcher: Send + Sync {
    fn fetch_page(
        &self,
        thread: ThreadId,
        page_no: u32,
        progress: &mut dyn FnMut(u64, u64),
    ) -> Result<Vec<u8>, FetchError>;
}

/// Receives progress events during a multi-page read
pub trait ProgressSink {
    /// One page of a whole-thread read finished (`done` of `total`)
    fn on_page(&mut self, done: u32, total: u32) {
        let _ = (done, total);
    }

    /// Byte-level progress of the page currently downloading
    fn on_bytes(&mut self, received: u64, total: u64) {
        let _ = (received, total);
    }
}

/// Sink that discards all progress events
pub struct NullProgress;

impl ProgressSink for NullProgress {}
