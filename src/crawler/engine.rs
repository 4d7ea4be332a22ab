//! Crawl engine - recursive fan-out over the link graph
//!
//! Each discovered URL becomes its own task. A task submits its URL to the
//! single-flight cache; only a fresh successful fetch emits a page and fans
//! out over the page's links at one less depth. Cached results mean another
//! branch already got there first, so the branch ends - that is the only
//! cycle-breaking mechanism, and it is race-free because lookup and insert
//! are a single cache operation.
//!
//! A global semaphore caps how many fetches run at once across the whole
//! traversal. The permit is acquired inside the cache's compute step, so
//! waiting on an already-pending URL is never throttled.

use crate::cache::{CacheResult, FetchCache};
use crate::config::{validate, CrawlConfig};
use crate::crawler::stream::{CrawlFailure, PageStream};
use crate::fetch::{FetchError, FetchOutcome, FetchedPage, Fetcher};
use crate::url::normalize_url;
use futures::future::{BoxFuture, FutureExt};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Semaphore};
use url::Url;

/// Crawls the link graph reachable from a start URL
///
/// One `Crawler` can run any number of crawls; each call to
/// [`crawl`](Self::crawl) gets its own cache, so visited-URL state never
/// leaks between runs.
pub struct Crawler<F: Fetcher> {
    fetcher: Arc<F>,
    config: CrawlConfig,
}

impl<F: Fetcher> Crawler<F> {
    /// Creates a crawler, validating the configuration
    pub fn new(fetcher: F, config: CrawlConfig) -> crate::Result<Self> {
        validate(&config)?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            config,
        })
    }

    /// Starts a crawl and returns its page stream
    ///
    /// The start URL is normalized first; a malformed URL is the one input
    /// error this method reports directly. The stream is returned
    /// immediately while tasks run in the background; it completes when
    /// every branch of the traversal has resolved.
    ///
    /// Must be called within a Tokio runtime.
    pub fn crawl(&self, start_url: &str) -> crate::Result<PageStream> {
        let start = normalize_url(start_url)?;

        let (pages_tx, pages_rx) = mpsc::channel(self.config.page_buffer);
        let failures = Arc::new(Mutex::new(Vec::new()));

        let ctx = Arc::new(CrawlContext {
            fetcher: Arc::clone(&self.fetcher),
            cache: FetchCache::new(),
            limiter: Semaphore::new(self.config.max_concurrency),
            failures: Arc::clone(&failures),
        });

        tracing::info!(
            "Starting crawl from {} (max depth {}, max concurrency {})",
            start,
            self.config.max_depth,
            self.config.max_concurrency
        );

        tokio::spawn(visit(ctx, start, self.config.max_depth, pages_tx));

        Ok(PageStream::new(pages_rx, failures))
    }
}

/// State shared by every task of one crawl run
struct CrawlContext<F: Fetcher> {
    fetcher: Arc<F>,
    cache: FetchCache,
    limiter: Semaphore,
    failures: Arc<Mutex<Vec<CrawlFailure>>>,
}

/// Processes one crawl task: fetch through the cache, emit, fan out
///
/// Boxed because the task graph is recursive: every spawned child contains
/// another `visit` future.
fn visit<F: Fetcher>(
    ctx: Arc<CrawlContext<F>>,
    url: Url,
    depth: u32,
    pages: mpsc::Sender<FetchedPage>,
) -> BoxFuture<'static, ()> {
    async move {
        // Consumer already dropped the stream; don't start new work.
        if pages.is_closed() {
            tracing::debug!("Stream closed, skipping {}", url);
            return;
        }

        let outcome = ctx
            .cache
            .submit(url.clone(), || fetch_limited(&ctx, &url))
            .await;

        match outcome {
            CacheResult::NewSuccess(page) => {
                let links = if depth > 0 { page.links.clone() } else { Vec::new() };

                if pages.send(page).await.is_err() {
                    tracing::debug!("Stream closed, dropping result for {}", url);
                    return;
                }

                for link in links {
                    match normalize_url(link.as_str()) {
                        Ok(next) => {
                            tokio::spawn(visit(
                                Arc::clone(&ctx),
                                next,
                                depth - 1,
                                pages.clone(),
                            ));
                        }
                        Err(e) => {
                            tracing::debug!("Skipping link {} from {}: {}", link, url, e);
                        }
                    }
                }
            }

            // Another branch already visited this URL; nothing to emit and
            // nothing to expand, or cycles would never terminate.
            CacheResult::CachedSuccess(_) => {
                tracing::trace!("Already visited {}", url);
            }

            CacheResult::NewFailure(error) => {
                tracing::warn!("Fetch failed for {}: {}", url, error);
                ctx.failures.lock().unwrap().push(CrawlFailure { url, error });
            }

            // The failure was already reported when it first happened.
            CacheResult::CachedFailure(error) => {
                tracing::trace!("Already failed {}: {}", url, error);
            }
        }
    }
    .boxed()
}

/// Runs one fetch under the global concurrency cap
async fn fetch_limited<F: Fetcher>(ctx: &CrawlContext<F>, url: &Url) -> FetchOutcome {
    let _permit = match ctx.limiter.acquire().await {
        Ok(permit) => permit,
        // The semaphore is never closed; resolve the entry rather than hang
        // its waiters if that ever changes.
        Err(_) => {
            return Err(FetchError::Cancelled {
                url: url.to_string(),
            })
        }
    };

    ctx.fetcher.fetch(url.clone()).await
}
