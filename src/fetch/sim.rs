//! Simulated fetcher
//!
//! A deterministic in-memory link graph with configurable artificial latency.
//! This is the fetcher the test suite crawls against, and it doubles as a
//! stand-in for downstream users who want to exercise the engine without a
//! network.

use crate::fetch::{FetchError, FetchOutcome, FetchedPage, Fetcher};
use crate::url::normalize_url;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// A [`Fetcher`] over a fixed, deterministic link graph
///
/// Every fetch sleeps for the configured latency, then looks the URL up in
/// the graph. URLs outside the graph fail with [`FetchError::InvalidUrl`].
///
/// # Example
///
/// ```
/// use kumo::fetch::SimulatedFetcher;
///
/// let fetcher = SimulatedFetcher::new()
///     .page("https://site.test/", "home", &["https://site.test/a"])
///     .page("https://site.test/a", "page a", &[]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedFetcher {
    pages: HashMap<Url, (String, Vec<Url>)>,
    latency: Duration,
}

impl SimulatedFetcher {
    /// Creates an empty graph with zero latency
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the artificial per-fetch latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Adds a page to the graph
    ///
    /// URLs are normalized the same way the crawl engine normalizes them, so
    /// graph keys and engine lookups always agree.
    ///
    /// # Panics
    ///
    /// Panics if `url` or any link is not a valid HTTP(S) URL; the graph is
    /// fixture data, and a malformed fixture is a programming error.
    pub fn page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        let key = normalize_url(url).expect("invalid URL in simulated graph");
        let links = links
            .iter()
            .map(|l| normalize_url(l).expect("invalid link in simulated graph"))
            .collect();
        self.pages.insert(key, (body.to_string(), links));
        self
    }

    /// Number of pages in the graph
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    async fn lookup(&self, url: Url) -> FetchOutcome {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.pages.get(&url) {
            Some((body, links)) => Ok(FetchedPage {
                url,
                body: body.clone(),
                links: links.clone(),
            }),
            None => Err(FetchError::InvalidUrl(url.to_string())),
        }
    }
}

impl Fetcher for SimulatedFetcher {
    fn fetch<'a>(&'a self, url: Url) -> BoxFuture<'a, FetchOutcome> {
        Box::pin(self.lookup(url))
    }
}
