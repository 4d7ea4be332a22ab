//! Result stream plumbing
//!
//! Pages are delivered over a bounded channel as fetches complete, so the
//! stream is lazy (slow consumers apply backpressure to the crawl) and
//! finishes exactly when the last crawl task has resolved and dropped its
//! sender. Failures never enter the stream; they accumulate on a side
//! channel the consumer can inspect at any point.

use crate::fetch::{FetchError, FetchedPage};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use url::Url;

/// A fetch failure reported during the crawl
///
/// Recorded once per distinct URL, when its one fetch attempt fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    /// The URL whose fetch failed
    pub url: Url,

    /// The shared error every branch waiting on this URL observed
    pub error: FetchError,
}

/// The lazy sequence of successfully fetched pages from one crawl run
///
/// Completion order follows fetch completion, not discovery order. The
/// stream is finite and not restartable; it represents a single run.
/// Dropping it early stops the crawl from expanding further.
pub struct PageStream {
    pages: mpsc::Receiver<FetchedPage>,
    failures: Arc<Mutex<Vec<CrawlFailure>>>,
}

impl PageStream {
    pub(crate) fn new(
        pages: mpsc::Receiver<FetchedPage>,
        failures: Arc<Mutex<Vec<CrawlFailure>>>,
    ) -> Self {
        Self { pages, failures }
    }

    /// Receives the next fetched page, or `None` once the crawl completes
    pub async fn recv(&mut self) -> Option<FetchedPage> {
        self.pages.recv().await
    }

    /// Drains the stream to completion and returns every page
    ///
    /// Takes `&mut self` so [`failures`](Self::failures) stays available
    /// once the crawl is done.
    pub async fn collect_all(&mut self) -> Vec<FetchedPage> {
        let mut pages = Vec::new();
        while let Some(page) = self.recv().await {
            pages.push(page);
        }
        pages
    }

    /// Snapshot of the failures reported so far
    ///
    /// Stable once the stream has completed; while the crawl is still
    /// running, failures may still be arriving.
    pub fn failures(&self) -> Vec<CrawlFailure> {
        self.failures.lock().unwrap().clone()
    }
}

impl futures::Stream for PageStream {
    type Item = FetchedPage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.pages.poll_recv(cx)
    }
}

impl std::fmt::Debug for PageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("failures", &self.failures.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn page(path: &str) -> FetchedPage {
        FetchedPage {
            url: Url::parse(&format!("https://stream.test{}", path)).unwrap(),
            body: path.to_string(),
            links: vec![],
        }
    }

    #[tokio::test]
    async fn test_recv_then_completion() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = PageStream::new(rx, Arc::new(Mutex::new(Vec::new())));

        tx.send(page("/a")).await.unwrap();
        drop(tx);

        assert_eq!(stream.recv().await.unwrap().body, "/a");
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_stream_impl() {
        let (tx, rx) = mpsc::channel(4);
        let stream = PageStream::new(rx, Arc::new(Mutex::new(Vec::new())));

        tx.send(page("/a")).await.unwrap();
        tx.send(page("/b")).await.unwrap();
        drop(tx);

        let bodies: Vec<String> = stream.map(|p| p.body).collect().await;
        assert_eq!(bodies, vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_failures_snapshot() {
        let (_tx, rx) = mpsc::channel::<FetchedPage>(1);
        let failures = Arc::new(Mutex::new(Vec::new()));
        let stream = PageStream::new(rx, Arc::clone(&failures));

        assert!(stream.failures().is_empty());

        let url = Url::parse("https://stream.test/broken").unwrap();
        failures.lock().unwrap().push(CrawlFailure {
            url: url.clone(),
            error: FetchError::InvalidUrl(url.to_string()),
        });

        assert_eq!(stream.failures().len(), 1);
        assert_eq!(stream.failures()[0].url, url);
    }
}
