//! URL normalization
//!
//! Two spellings of the same page must map to the same cache key, otherwise
//! the crawler fetches the page twice. Normalization keeps the rules small:
//! scheme validation, fragment removal, and path cleanup. Host lowercasing
//! and dot-segment resolution are already performed by the `url` crate's
//! parser.

use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the canonical form used as a cache key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
/// 5. Collapse duplicate slashes in the path and remove the trailing slash
///    (except for the root path)
///
/// # Examples
///
/// ```
/// use kumo::url::normalize_url;
///
/// let url = normalize_url("https://example.com/pkg/#readme").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/pkg");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    Ok(url)
}

/// Collapses duplicate slashes and removes the trailing slash
///
/// The root path stays `/`; `Url::parse` has already resolved `.` and `..`
/// segments before this runs.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}
