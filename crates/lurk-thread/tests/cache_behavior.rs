//! Cache behavior: hit/miss accounting, whole-thread aggregation,
//! failure atomicity, and duplicate-request collapsing.

use lurk_content::{ExtractError, Fragment, PageExtractor, Post, PostList, User};
use lurk_html::HtmlTag;
use lurk_thread::{
    FetchError, NullProgress, PageFetcher, ProgressSink, ThreadCache, ThreadError, ThreadId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Extractor for the synthetic page markup the mock fetcher serves:
/// a `<div class="pages">` pagination block and one
/// `<div class="post" data-author=...>` per post.
struct TestExtractor;

impl TestExtractor {
    fn parse(page: &[u8]) -> Result<lurk_html::Document, ExtractError> {
        lurk_html::parse_bytes(page).map_err(|e| ExtractError::Parse(e.to_string()))
    }
}

impl PageExtractor for TestExtractor {
    fn extract_page_count(&self, page: &[u8]) -> Result<u32, ExtractError> {
        let doc = Self::parse(page)?;
        let body = doc.root().children(true)[1];
        let block = body
            .descendants_by_class("pages", HtmlTag::Div)
            .into_iter()
            .next()
            .ok_or(ExtractError::MissingPageCount)?;
        block
            .children_inner_text()
            .trim()
            .parse()
            .map_err(|_| ExtractError::MissingPageCount)
    }

    fn extract_page_posts(&self, page: &[u8]) -> Result<PostList, ExtractError> {
        let doc = Self::parse(page)?;
        let body = doc.root().children(true)[1];
        let blocks = body.descendants_by_class("post", HtmlTag::Div);
        if blocks.is_empty() {
            return Err(ExtractError::MissingPostBlock);
        }
        let mut posts = PostList::new();
        for block in blocks {
            let author = block
                .attribute("data-author")
                .ok_or(ExtractError::MissingAuthor)?;
            posts.push(Arc::new(Post {
                id: None,
                author: Arc::new(User::named(author)),
                fragments: vec![Fragment::PlainText(block.children_inner_text())],
                timestamp: String::new(),
                last_edit: None,
                like_count: 0,
            }));
        }
        Ok(posts)
    }
}

fn page_html(page_count: u32, posts: &[(&str, &str)]) -> Vec<u8> {
    let mut html = format!("<html><body><div class=\"pages\">{page_count}</div>");
    for (author, text) in posts {
        html.push_str(&format!("<div class=\"post\" data-author=\"{author}\">{text}</div>"));
    }
    html.push_str("</body></html>");
    html.into_bytes()
}

type FetchCounts = Arc<Mutex<HashMap<(ThreadId, u32), u32>>>;

struct MockFetcher {
    pages: HashMap<(ThreadId, u32), Vec<u8>>,
    fail: HashSet<(ThreadId, u32)>,
    counts: FetchCounts,
    delay: Option<Duration>,
}

impl MockFetcher {
    fn new() -> (Self, FetchCounts) {
        let counts = FetchCounts::default();
        let fetcher = Self {
            pages: HashMap::new(),
            fail: HashSet::new(),
            counts: Arc::clone(&counts),
            delay: None,
        };
        (fetcher, counts)
    }

    /// A thread of `page_count` pages, one post per page authored by
    /// `user<page>` with body `page <page>`
    fn with_thread(mut self, thread: ThreadId, page_count: u32) -> Self {
        for page_no in 1..=page_count {
            let author = format!("user{page_no}");
            let text = format!("page {page_no}");
            self.pages.insert(
                (thread, page_no),
                page_html(page_count, &[(&author, &text)]),
            );
        }
        self
    }

    fn with_page(mut self, thread: ThreadId, page_no: u32, bytes: Vec<u8>) -> Self {
        self.pages.insert((thread, page_no), bytes);
        self
    }

    fn failing(mut self, thread: ThreadId, page_no: u32) -> Self {
        self.fail.insert((thread, page_no));
        self
    }

    fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl PageFetcher for MockFetcher {
    fn fetch_page(
        &self,
        thread: ThreadId,
        page_no: u32,
        progress: &mut dyn FnMut(u64, u64),
    ) -> Result<Vec<u8>, FetchError> {
        *self
            .counts
            .lock()
            .unwrap()
            .entry((thread, page_no))
            .or_insert(0) += 1;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.fail.contains(&(thread, page_no)) {
            return Err(FetchError {
                thread,
                page: page_no,
                reason: "connection reset".to_string(),
            });
        }
        let bytes = self
            .pages
            .get(&(thread, page_no))
            .cloned()
            .ok_or_else(|| FetchError {
                thread,
                page: page_no,
                reason: "not found".to_string(),
            })?;
        let total = bytes.len() as u64;
        progress(total / 2, total);
        progress(total, total);
        Ok(bytes)
    }
}

fn fetches(counts: &FetchCounts, thread: ThreadId, page_no: u32) -> u32 {
    counts
        .lock()
        .unwrap()
        .get(&(thread, page_no))
        .copied()
        .unwrap_or(0)
}

const THREAD: ThreadId = ThreadId {
    section_id: 22,
    thread_id: 358149,
};

/// `RUST_LOG=lurk_thread=debug cargo test` shows the cache's decisions
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_page_count_is_fetched_once() {
    init_tracing();
    let (fetcher, counts) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 4), TestExtractor);

    assert_eq!(cache.page_count(THREAD, &mut NullProgress).unwrap(), 4);
    assert_eq!(cache.page_count(THREAD, &mut NullProgress).unwrap(), 4);
    assert_eq!(fetches(&counts, THREAD, 1), 1);
    assert!(cache.contains_page_count(THREAD));
}

#[test]
fn test_page_count_download_reports_byte_progress() {
    struct ByteCounter(u32);
    impl ProgressSink for ByteCounter {
        fn on_bytes(&mut self, received: u64, total: u64) {
            assert!(received <= total);
            self.0 += 1;
        }
    }

    let (fetcher, _) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 2), TestExtractor);

    let mut counter = ByteCounter(0);
    cache.page_count(THREAD, &mut counter).unwrap();
    assert!(counter.0 > 0, "page-count download emitted no byte progress");

    // a cache hit downloads nothing, so no further events
    let events_after_miss = counter.0;
    cache.page_count(THREAD, &mut counter).unwrap();
    assert_eq!(counter.0, events_after_miss);
}

#[test]
fn test_page_posts_cached_per_page() {
    let (fetcher, counts) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 3), TestExtractor);

    let page2 = cache.page_posts(THREAD, 2, &mut NullProgress).unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].author.name, "user2");
    assert_eq!(page2[0].plain_text(), "page 2");

    // repeat read is served from memory
    cache.page_posts(THREAD, 2, &mut NullProgress).unwrap();
    assert_eq!(fetches(&counts, THREAD, 2), 1);

    // other pages are independent entries
    cache.page_posts(THREAD, 3, &mut NullProgress).unwrap();
    assert_eq!(fetches(&counts, THREAD, 3), 1);
    assert_eq!(cache.cached_page_numbers(THREAD), vec![2, 3]);
    assert!(!cache.contains_page(THREAD, 1));
}

#[test]
fn test_page_posts_seeds_page_count() {
    let (fetcher, counts) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 3), TestExtractor);

    cache.page_posts(THREAD, 1, &mut NullProgress).unwrap();
    // the pagination block of the fetched page fills the count layer,
    // so no second download of page 1 happens
    assert_eq!(cache.page_count(THREAD, &mut NullProgress).unwrap(), 3);
    assert_eq!(fetches(&counts, THREAD, 1), 1);
}

#[test]
fn test_thread_posts_aggregates_in_page_order() {
    let (fetcher, _) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 3), TestExtractor);

    let all = cache.thread_posts(THREAD, &mut NullProgress).unwrap();
    let authors: Vec<&str> = all.iter().map(|p| p.author.name.as_str()).collect();
    assert_eq!(authors, vec!["user1", "user2", "user3"]);

    let stats = cache.stats();
    assert_eq!(stats.page_counts, 1);
    assert_eq!(stats.pages, 3);
    assert!(stats.approx_bytes > 0);
}

#[test]
fn test_thread_posts_reuses_cached_pages() {
    let (fetcher, counts) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 3), TestExtractor);

    cache.page_posts(THREAD, 2, &mut NullProgress).unwrap();
    cache.thread_posts(THREAD, &mut NullProgress).unwrap();

    assert_eq!(fetches(&counts, THREAD, 1), 1);
    assert_eq!(fetches(&counts, THREAD, 2), 1);
    assert_eq!(fetches(&counts, THREAD, 3), 1);
}

#[test]
fn test_progress_reports_every_page() {
    struct Recorder {
        pages: Vec<(u32, u32)>,
        saw_bytes: bool,
    }
    impl ProgressSink for Recorder {
        fn on_page(&mut self, done: u32, total: u32) {
            self.pages.push((done, total));
        }
        fn on_bytes(&mut self, received: u64, total: u64) {
            assert!(received <= total);
            self.saw_bytes = true;
        }
    }

    let (fetcher, _) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 3), TestExtractor);

    let mut recorder = Recorder {
        pages: Vec::new(),
        saw_bytes: false,
    };
    cache.thread_posts(THREAD, &mut recorder).unwrap();
    assert_eq!(recorder.pages, vec![(1, 3), (2, 3), (3, 3)]);
    assert!(recorder.saw_bytes);
}

#[test]
fn test_failed_page_aborts_but_keeps_earlier_pages() {
    let (fetcher, _) = MockFetcher::new();
    let fetcher = fetcher.with_thread(THREAD, 5).failing(THREAD, 3);
    let cache = ThreadCache::new(fetcher, TestExtractor);

    let err = cache.thread_posts(THREAD, &mut NullProgress).unwrap_err();
    match err {
        ThreadError::Network(f) => assert_eq!(f.page, 3),
        other => panic!("expected network error, got {other}"),
    }

    assert!(cache.contains_page(THREAD, 1));
    assert!(cache.contains_page(THREAD, 2));
    assert!(!cache.contains_page(THREAD, 3));
    assert!(!cache.contains_page(THREAD, 4));

    // a later retry picks up where it left off
    assert!(cache.page_posts(THREAD, 4, &mut NullProgress).is_ok());
}

#[test]
fn test_extract_failure_carries_page_number() {
    let (fetcher, _) = MockFetcher::new();
    let fetcher = fetcher
        .with_thread(THREAD, 2)
        .with_page(THREAD, 2, page_html(2, &[])); // no post blocks
    let cache = ThreadCache::new(fetcher, TestExtractor);

    let err = cache.thread_posts(THREAD, &mut NullProgress).unwrap_err();
    match err {
        ThreadError::Extract { page, source } => {
            assert_eq!(page, 2);
            assert!(matches!(source, ExtractError::MissingPostBlock));
        }
        other => panic!("expected extract error, got {other}"),
    }
    assert!(!cache.contains_page(THREAD, 2));
}

#[test]
fn test_page_count_mismatch_keeps_first_value() {
    let (fetcher, _) = MockFetcher::new();
    // page 2 claims the thread grew to 3 pages
    let fetcher = fetcher
        .with_thread(THREAD, 2)
        .with_page(THREAD, 2, page_html(3, &[("user2", "page 2")]));
    let cache = ThreadCache::new(fetcher, TestExtractor);

    assert_eq!(cache.page_count(THREAD, &mut NullProgress).unwrap(), 2);
    cache.page_posts(THREAD, 2, &mut NullProgress).unwrap();
    assert_eq!(cache.page_count(THREAD, &mut NullProgress).unwrap(), 2);
}

#[test]
fn test_concurrent_requests_for_same_page_download_once() {
    let (fetcher, counts) = MockFetcher::new();
    let fetcher = fetcher
        .with_thread(THREAD, 2)
        .slow(Duration::from_millis(30));
    let cache = ThreadCache::new(fetcher, TestExtractor);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let posts = cache.page_posts(THREAD, 1, &mut NullProgress).unwrap();
                assert_eq!(posts.len(), 1);
            });
        }
    });
    assert_eq!(fetches(&counts, THREAD, 1), 1);
}

#[test]
fn test_clear_drops_everything() {
    let (fetcher, counts) = MockFetcher::new();
    let cache = ThreadCache::new(fetcher.with_thread(THREAD, 2), TestExtractor);

    cache.thread_posts(THREAD, &mut NullProgress).unwrap();
    cache.clear();
    assert!(!cache.contains_page_count(THREAD));
    assert_eq!(cache.stats().pages, 0);

    cache.page_posts(THREAD, 1, &mut NullProgress).unwrap();
    assert_eq!(fetches(&counts, THREAD, 1), 2);
}
