//! Kumo: a concurrent, depth-bounded link graph crawler
//!
//! This crate explores the link graph reachable from a start URL, fetching
//! every distinct URL at most once regardless of how many branches discover
//! it, bounding the number of fetches in flight, and delivering successfully
//! fetched pages as a stream while per-branch failures are reported on the
//! side without aborting the rest of the traversal.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod url;

use thiserror::Error;

/// Main error type for Kumo operations
///
/// These are setup-time failures of the crawl entrypoints. Failures of
/// individual page fetches never surface here; they travel through the
/// failure side channel of the page stream instead.
#[derive(Debug, Error)]
pub enum KumoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Kumo operations
pub type Result<T> = std::result::Result<T, KumoError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{CacheResult, FetchCache};
pub use config::CrawlConfig;
pub use crawler::{crawl, CrawlFailure, Crawler, PageStream};
pub use fetch::{FetchError, FetchedPage, Fetcher, HttpFetcher, SimulatedFetcher};
pub use crate::url::normalize_url;
