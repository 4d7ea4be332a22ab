//! HTTP fetcher implementation
//!
//! Fetches pages over HTTP with reqwest and extracts outbound links from the
//! HTML body. Errors are classified into the shared [`FetchError`] taxonomy
//! so the crawl engine can report them uniformly.

use crate::fetch::parser::extract_links;
use crate::fetch::{FetchError, FetchOutcome, FetchedPage, Fetcher};
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default User-Agent sent with every request
const DEFAULT_USER_AGENT: &str = concat!("kumo/", env!("CARGO_PKG_VERSION"));

/// A [`Fetcher`] backed by a real HTTP client
///
/// Only `text/html` responses become pages; other content types are a fetch
/// failure, since there are no links to expand in them and the crawler has
/// no use for opaque bodies.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the default client configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kumo::fetch::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new().unwrap();
    /// ```
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Creates a fetcher that identifies itself with the given User-Agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Wraps an existing client, keeping its configuration
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get_page(&self, url: Url) -> FetchOutcome {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchError::ContentType {
                url: url.to_string(),
                content_type,
            });
        }

        // The final URL may differ from the requested one after redirects;
        // links must resolve against where the body actually came from.
        let final_url = response.url().clone();

        let body = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let links = extract_links(&body, &final_url);
        tracing::debug!("Fetched {} ({} links)", url, links.len());

        Ok(FetchedPage { url, body, links })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: Url) -> BoxFuture<'a, FetchOutcome> {
        Box::pin(self.get_page(url))
    }
}

/// Classifies a reqwest error into the shared error taxonomy
fn classify_request_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_builder() || error.is_request() {
        FetchError::InvalidUrl(url.to_string())
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
