//! Page fetching boundary
//!
//! This module defines the [`Fetcher`] trait the crawl engine drives, the
//! [`FetchedPage`] value it produces, and the [`FetchError`] taxonomy shared
//! by every implementation:
//! - [`HttpFetcher`]: real HTTP fetching over reqwest
//! - [`SimulatedFetcher`]: deterministic in-memory link graph for tests

mod http;
mod parser;
mod sim;

pub use http::HttpFetcher;
pub use parser::extract_links;
pub use sim::SimulatedFetcher;

use futures::future::BoxFuture;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
///
/// Immutable once produced. `links` preserves document order; the engine is
/// free to fetch them in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The URL this page was fetched from
    pub url: Url,

    /// Page body content
    pub body: String,

    /// Outbound links discovered on the page
    pub links: Vec<Url>,
}

/// Errors a fetch attempt can end with
///
/// Fetch errors are shared: when several branches of the crawl wait on the
/// same URL, every one of them observes the same error value. That is why
/// this type is `Clone` and carries owned strings rather than source errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("unexpected content type '{content_type}' for {url}")]
    ContentType { url: String, content_type: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("fetch cancelled for {url}")]
    Cancelled { url: String },
}

/// Outcome of a single fetch attempt
pub type FetchOutcome = Result<FetchedPage, FetchError>;

/// Maps a URL to a page body plus outbound links, or fails
///
/// Implementations must be shareable across the crawl's worker tasks, which
/// is where the `Send + Sync + 'static` bounds come from. The engine calls
/// `fetch` at most once per distinct URL per crawl run.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch<'a>(&'a self, url: Url) -> BoxFuture<'a, FetchOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::HttpStatus {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP status 404 for https://example.com/missing"
        );
    }
}
