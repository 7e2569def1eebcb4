//! Two-layer thread content cache with request collapsing

use crate::fetch::{FetchError, PageFetcher, ProgressSink};
use crate::ThreadId;
use lurk_content::{post_list_size, ExtractError, PageExtractor, PostList};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

/// Why a cache read could not be served
#[derive(Debug, thiserror::Error)]
pub enum ThreadError {
    #[error(transparent)]
    Network(#[from] FetchError),
    #[error("page {page}: {source}")]
    Extract {
        page: u32,
        #[source]
        source: ExtractError,
    },
}

/// Key of one in-flight load, for collapsing duplicate requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FlightKey {
    PageCount(ThreadId),
    Page(ThreadId, u32),
}

/// Cache occupancy snapshot, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Threads with a cached page count
    pub page_counts: usize,
    /// Total cached (thread, page) post lists
    pub pages: usize,
    /// Approximate heap bytes held by cached posts
    pub approx_bytes: usize,
}

/// Memoizing front for thread-page downloads.
///
/// Layer one maps a thread to its page count, layer two maps
/// (thread, page) to the extracted posts. Entries are only inserted
/// after a page fully downloads and extracts; a failure leaves the cache
/// as it was. Concurrent requests for the same key wait on a shared
/// in-flight gate and then read the freshly cached value instead of
/// downloading again.
pub struct ThreadCache<F, E> {
    fetcher: F,
    extractor: E,
    page_counts: Mutex<HashMap<ThreadId, u32>>,
    page_posts: Mutex<HashMap<ThreadId, BTreeMap<u32, PostList>>>,
    in_flight: Mutex<HashMap<FlightKey, Arc<Mutex<()>>>>,
}

/// A poisoned lock only means another thread panicked mid-update; the
/// maps are always left consistent, so keep going with the inner value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<F: PageFetcher, E: PageExtractor> ThreadCache<F, E> {
    pub fn new(fetcher: F, extractor: E) -> Self {
        Self {
            fetcher,
            extractor,
            page_counts: Mutex::new(HashMap::new()),
            page_posts: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages in the thread. Downloads the first page on a
    /// cache miss, reporting byte progress to `progress`; serves from
    /// memory after.
    pub fn page_count(
        &self,
        thread: ThreadId,
        progress: &mut dyn ProgressSink,
    ) -> Result<u32, ThreadError> {
        if let Some(&count) = lock(&self.page_counts).get(&thread) {
            tracing::debug!(%thread, count, "page count cache hit");
            return Ok(count);
        }

        let gate = self.acquire_gate(FlightKey::PageCount(thread));
        let outcome = {
            let _guard = lock(&gate);
            let cached = lock(&self.page_counts).get(&thread).copied();
            match cached {
                Some(count) => {
                    tracing::debug!(%thread, count, "page count filled while waiting");
                    Ok(count)
                }
                None => self.load_page_count(thread, progress),
            }
        };
        self.release_gate(FlightKey::PageCount(thread));
        outcome
    }

    /// Posts of one page (1-based). Downloads and extracts on a miss,
    /// reporting byte progress to `progress`; serves from memory after.
    pub fn page_posts(
        &self,
        thread: ThreadId,
        page_no: u32,
        progress: &mut dyn ProgressSink,
    ) -> Result<PostList, ThreadError> {
        if let Some(posts) = self.cached_page(thread, page_no) {
            tracing::debug!(%thread, page_no, "page posts cache hit");
            return Ok(posts);
        }

        let gate = self.acquire_gate(FlightKey::Page(thread, page_no));
        let outcome = {
            let _guard = lock(&gate);
            match self.cached_page(thread, page_no) {
                Some(posts) => {
                    tracing::debug!(%thread, page_no, "page posts filled while waiting");
                    Ok(posts)
                }
                None => self.load_page_posts(thread, page_no, progress),
            }
        };
        self.release_gate(FlightKey::Page(thread, page_no));
        outcome
    }

    /// All posts of the thread, pages in ascending order. Serves cached
    /// pages and downloads only the missing ones; `progress.on_page` is
    /// called after each page. Stops at the first failing page, leaving
    /// earlier pages cached.
    pub fn thread_posts(
        &self,
        thread: ThreadId,
        progress: &mut dyn ProgressSink,
    ) -> Result<PostList, ThreadError> {
        let count = self.page_count(thread, progress)?;
        tracing::debug!(%thread, count, "aggregating whole thread");

        let mut all = PostList::new();
        for page_no in 1..=count {
            let posts = self.page_posts(thread, page_no, progress)?;
            all.extend(posts);
            progress.on_page(page_no, count);
        }
        Ok(all)
    }

    // ----- diagnostics -----

    pub fn contains_page_count(&self, thread: ThreadId) -> bool {
        lock(&self.page_counts).contains_key(&thread)
    }

    pub fn contains_page(&self, thread: ThreadId, page_no: u32) -> bool {
        lock(&self.page_posts)
            .get(&thread)
            .is_some_and(|pages| pages.contains_key(&page_no))
    }

    /// Cached pages for one thread
    pub fn cached_page_numbers(&self, thread: ThreadId) -> Vec<u32> {
        lock(&self.page_posts)
            .get(&thread)
            .map(|pages| pages.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Approximate bytes held by the page-count layer
    pub fn page_count_cache_size(&self) -> usize {
        let counts = lock(&self.page_counts);
        counts.len() * (std::mem::size_of::<ThreadId>() + std::mem::size_of::<u32>())
    }

    /// Approximate bytes held by cached post lists
    pub fn page_posts_cache_size(&self) -> usize {
        lock(&self.page_posts)
            .values()
            .flat_map(|pages| pages.values())
            .map(post_list_size)
            .sum()
    }

    pub fn stats(&self) -> CacheStats {
        let counts = lock(&self.page_counts);
        let posts = lock(&self.page_posts);
        let pages = posts.values().map(|p| p.len()).sum();
        let approx_bytes = posts
            .values()
            .flat_map(|pages| pages.values())
            .map(post_list_size)
            .sum();
        CacheStats {
            page_counts: counts.len(),
            pages,
            approx_bytes,
        }
    }

    /// Drop all cached content
    pub fn clear(&self) {
        lock(&self.page_counts).clear();
        lock(&self.page_posts).clear();
        tracing::debug!("thread cache cleared");
    }

    // ----- internals -----

    fn cached_page(&self, thread: ThreadId, page_no: u32) -> Option<PostList> {
        lock(&self.page_posts)
            .get(&thread)
            .and_then(|pages| pages.get(&page_no))
            .cloned()
    }

    fn load_page_count(
        &self,
        thread: ThreadId,
        progress: &mut dyn ProgressSink,
    ) -> Result<u32, ThreadError> {
        tracing::debug!(%thread, "downloading first page for page count");
        let bytes = self
            .fetcher
            .fetch_page(thread, 1, &mut |received, total| {
                progress.on_bytes(received, total)
            })?;
        let count = self
            .extractor
            .extract_page_count(&bytes)
            .map_err(|source| ThreadError::Extract { page: 1, source })?;
        lock(&self.page_counts).insert(thread, count);
        tracing::debug!(%thread, count, "page count cached");
        Ok(count)
    }

    fn load_page_posts(
        &self,
        thread: ThreadId,
        page_no: u32,
        progress: &mut dyn ProgressSink,
    ) -> Result<PostList, ThreadError> {
        tracing::debug!(%thread, page_no, "downloading page");
        let bytes = self
            .fetcher
            .fetch_page(thread, page_no, &mut |received, total| {
                progress.on_bytes(received, total)
            })?;
        let posts = self
            .extractor
            .extract_page_posts(&bytes)
            .map_err(|source| ThreadError::Extract { page: page_no, source })?;

        // every page carries the pagination block; use it to seed or
        // cross-check the page-count layer
        match self.extractor.extract_page_count(&bytes) {
            Ok(count) => {
                let mut counts = lock(&self.page_counts);
                match counts.get(&thread) {
                    Some(&cached) if cached != count => {
                        tracing::warn!(
                            %thread, cached, seen = count,
                            "thread page count changed since it was cached"
                        );
                    }
                    Some(_) => {}
                    None => {
                        counts.insert(thread, count);
                    }
                }
            }
            Err(err) => {
                tracing::debug!(%thread, page_no, %err, "no pagination block on page");
            }
        }

        lock(&self.page_posts)
            .entry(thread)
            .or_default()
            .insert(page_no, posts.clone());
        tracing::debug!(%thread, page_no, posts = posts.len(), "page posts cached");
        Ok(posts)
    }

    fn acquire_gate(&self, key: FlightKey) -> Arc<Mutex<()>> {
        Arc::clone(lock(&self.in_flight).entry(key).or_default())
    }

    fn release_gate(&self, key: FlightKey) {
        lock(&self.in_flight).remove(&key);
    }
}
