use serde::Deserialize;

/// Behavior configuration for one crawler
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Maximum traversal depth from the start URL; 0 fetches only the start
    /// page
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of fetches in flight across the whole traversal
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Capacity of the page channel between the crawl and its consumer
    #[serde(rename = "page-buffer", default = "default_page_buffer")]
    pub page_buffer: usize,
}

fn default_max_concurrency() -> usize {
    4
}

fn default_page_buffer() -> usize {
    16
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_concurrency: default_max_concurrency(),
            page_buffer: default_page_buffer(),
        }
    }
}
