//! lurk thread cache
//!
//! Memoizes downloaded forum-thread content in two layers: page counts
//! per thread and extracted posts per (thread, page). Whole-thread reads
//! aggregate cached pages and only download what is missing. Concurrent
//! requests for the same key are collapsed into one download.

mod cache;
mod fetch;

pub use cache::{CacheStats, ThreadCache, ThreadError};
pub use fetch::{FetchError, NullProgress, PageFetcher, ProgressSink};

use std::fmt;

/// Identifies one forum thread: the section it lives in plus its own id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThreadId {
    pub section_id: u32,
    pub thread_id: u32,
}

impl ThreadId {
    pub fn new(section_id: u32, thread_id: u32) -> Self {
        Self {
            section_id,
            thread_id,
        }
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section_id, self.thread_id)
    }
}
