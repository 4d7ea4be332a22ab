//! Single-flight fetch cache
//!
//! Ensures each distinct URL is fetched at most once per crawl run. The first
//! caller to submit a URL becomes the leader and runs the fetch; everyone who
//! submits the same URL while that fetch is in flight (or any time after)
//! shares its outcome. Results are tagged so the engine can tell a fresh
//! outcome from a shared one, and a success from a failure, in one match.
//!
//! The entry table is the crawl's visited set. Membership check and insertion
//! happen under one lock acquisition, so two branches discovering the same
//! URL at the same instant cannot both start a fetch.

use crate::fetch::{FetchError, FetchOutcome, FetchedPage};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tokio::sync::watch;
use url::Url;

/// Outcome of submitting a URL to the cache
///
/// `New*` means this caller's submission triggered the fetch; `Cached*` means
/// the outcome was produced by an earlier submission of the same URL. Only
/// `NewSuccess` carries a page the engine has not seen before, which is what
/// makes cached results branch-terminal during expansion.
#[derive(Debug, Clone)]
pub enum CacheResult {
    /// This submission ran the fetch and it succeeded
    NewSuccess(FetchedPage),

    /// This submission ran the fetch and it failed
    NewFailure(FetchError),

    /// Another submission already fetched this URL successfully
    CachedSuccess(FetchedPage),

    /// Another submission already fetched this URL and it failed
    CachedFailure(FetchError),
}

impl CacheResult {
    /// Whether this result came from a fetch triggered by this submission
    pub fn is_new(&self) -> bool {
        matches!(self, CacheResult::NewSuccess(_) | CacheResult::NewFailure(_))
    }

    /// The fetched page, for either success variant
    pub fn page(&self) -> Option<&FetchedPage> {
        match self {
            CacheResult::NewSuccess(page) | CacheResult::CachedSuccess(page) => Some(page),
            _ => None,
        }
    }
}

/// The shared resolution cell of one cache entry
///
/// `None` while the fetch is pending, `Some(outcome)` once resolved. The
/// transition happens exactly once; entry contents are immutable afterwards.
type Cell = watch::Receiver<Option<FetchOutcome>>;

/// What a submission turned out to be, decided under the entry-table lock
enum Flight {
    /// First submission of this URL; holds the sender that resolves the entry
    Leader(watch::Sender<Option<FetchOutcome>>),

    /// URL already has an entry; holds a handle to await its resolution
    Follower(Cell),
}

/// Single-flight cache over fetch outcomes, keyed by normalized URL
///
/// Entries live for the lifetime of the cache; failures are remembered and
/// never retried. The lock guards only the lookup-or-insert decision, never
/// the fetch itself, so a slow fetch on one URL cannot delay submissions of
/// other URLs.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<Url, Cell>>,
}

impl FetchCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct URLs ever submitted
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether any URL has been submitted yet
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Submits a URL, running `compute` only if the URL has never been seen
    ///
    /// At most one invocation of `compute` happens per distinct URL for the
    /// cache's lifetime, no matter how many callers submit it concurrently.
    /// The leader runs `compute` and gets a `New*` result; every other caller
    /// awaits the leader's outcome and gets the same value or error as a
    /// `Cached*` result.
    ///
    /// If the leader's future is dropped before the fetch resolves, the entry
    /// is resolved to [`FetchError::Cancelled`] so waiters are released
    /// instead of hanging.
    pub async fn submit<F, Fut>(&self, url: Url, compute: F) -> CacheResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchOutcome>,
    {
        let flight = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(&url) {
                Some(cell) => Flight::Follower(cell.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    entries.insert(url.clone(), rx);
                    Flight::Leader(tx)
                }
            }
        };

        match flight {
            Flight::Leader(tx) => {
                let guard = ResolveGuard::new(tx, url);
                let outcome = compute().await;
                guard.resolve(outcome.clone());

                match outcome {
                    Ok(page) => CacheResult::NewSuccess(page),
                    Err(error) => CacheResult::NewFailure(error),
                }
            }
            Flight::Follower(cell) => match await_resolution(cell).await {
                Ok(page) => CacheResult::CachedSuccess(page),
                Err(error) => CacheResult::CachedFailure(error),
            },
        }
    }
}

/// Waits until a cell resolves and returns the shared outcome
async fn await_resolution(mut cell: Cell) -> FetchOutcome {
    loop {
        if let Some(outcome) = cell.borrow_and_update().clone() {
            return outcome;
        }

        // The entry table holds a receiver for every entry, so the sender
        // cannot vanish before a value is published; the guard resolves the
        // entry even when the leader is cancelled.
        if cell.changed().await.is_err() {
            if let Some(outcome) = cell.borrow().clone() {
                return outcome;
            }
            unreachable!("cache entry dropped while unresolved");
        }
    }
}

/// Resolves the entry exactly once, even if the leader never finishes
///
/// Dropped without [`resolve`](Self::resolve) (the leader's future was
/// cancelled, or the fetch panicked), the entry resolves to
/// [`FetchError::Cancelled`] so followers of this URL are released.
struct ResolveGuard {
    slot: Option<(watch::Sender<Option<FetchOutcome>>, Url)>,
}

impl ResolveGuard {
    fn new(tx: watch::Sender<Option<FetchOutcome>>, url: Url) -> Self {
        Self {
            slot: Some((tx, url)),
        }
    }

    fn resolve(mut self, outcome: FetchOutcome) {
        if let Some((tx, _)) = self.slot.take() {
            let _ = tx.send(Some(outcome));
        }
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        if let Some((tx, url)) = self.slot.take() {
            tracing::warn!("Fetch of {} abandoned before resolving", url);
            let _ = tx.send(Some(Err(FetchError::Cancelled {
                url: url.to_string(),
            })));
        }
    }
}
