//! Crawler module - traversal orchestration
//!
//! This module contains the crawl engine and the page stream it feeds:
//! - Recursive fan-out over discovered links, bounded by depth
//! - Single-flight deduplication of fetches across branches
//! - Global concurrency cap on in-flight fetches
//! - Per-branch failure isolation

mod engine;
mod stream;

pub use engine::Crawler;
pub use stream::{CrawlFailure, PageStream};

use crate::config::CrawlConfig;
use crate::fetch::Fetcher;

/// Crawls the link graph from `start_url` down to `max_depth`
///
/// Convenience entrypoint using the default configuration (concurrency cap
/// of 4). `max_depth == 0` yields only the start page, with no expansion.
/// Must be called within a Tokio runtime.
///
/// # Example
///
/// ```
/// use kumo::fetch::SimulatedFetcher;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> kumo::Result<()> {
/// let fetcher = SimulatedFetcher::new()
///     .page("https://site.test/", "home", &["https://site.test/a"])
///     .page("https://site.test/a", "page a", &[]);
///
/// let mut pages = kumo::crawl("https://site.test/", fetcher, 1)?;
/// while let Some(page) = pages.recv().await {
///     println!("{}: {}", page.url, page.body);
/// }
/// # Ok(())
/// # }
/// ```
pub fn crawl<F: Fetcher>(start_url: &str, fetcher: F, max_depth: u32) -> crate::Result<PageStream> {
    let config = CrawlConfig {
        max_depth,
        ..CrawlConfig::default()
    };

    Crawler::new(fetcher, config)?.crawl(start_url)
}
