//! HTML link extraction
//!
//! Pulls outbound links out of a fetched page body so the crawl engine can
//! fan out over them.

use scraper::{Html, Selector};
use url::Url;

/// Extracts outbound links from HTML content, in document order
///
/// Relative hrefs are resolved against `base_url`. Links that cannot become
/// crawlable URLs are skipped:
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
/// - anything that is not HTTP(S) after resolution
/// - `<a ... download>` targets
/// - hrefs that fail to parse
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let a_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return links,
    };

    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(url) = resolve_link(href, base_url) {
                links.push(url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute crawlable URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_lowercase();
    for scheme in ["javascript:", "mailto:", "tel:", "data:"] {
        if lowered.starts_with(scheme) {
            return None;
        }
    }

    let resolved = base_url.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/index.html").unwrap()
    }

    #[test]
    fn test_extract_absolute_links() {
        let html = r#"<html><body><a href="https://example.com/page1">One</a></body></html>"#;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/page1");
    }

    #[test]
    fn test_extract_relative_links() {
        let html = r#"<a href="/pkg/">pkg</a><a href="guide">guide</a>"#;
        let links = extract_links(html, &base());
        assert_eq!(
            links,
            vec![
                Url::parse("https://example.com/pkg/").unwrap(),
                Url::parse("https://example.com/docs/guide").unwrap(),
            ]
        );
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"<a href="/b">b</a><a href="/a">a</a><a href="/c">c</a>"#;
        let links = extract_links(html, &base());
        let paths: Vec<&str> = links.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/b", "/a", "/c"]);
    }

    #[test]
    fn test_skip_non_crawlable_schemes() {
        let html = r#"
            <a href="javascript:void(0)">js</a>
            <a href="mailto:someone@example.com">mail</a>
            <a href="tel:+123456789">tel</a>
            <a href="data:text/plain,hi">data</a>
            <a href="ftp://example.com/file">ftp</a>
        "#;
        let links = extract_links(html, &base());
        assert!(links.is_empty());
    }

    #[test]
    fn test_skip_download_links() {
        let html = r#"<a href="/archive.tar.gz" download>tarball</a><a href="/page">page</a>"#;
        let links = extract_links(html, &base());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].path(), "/page");
    }

    #[test]
    fn test_skip_empty_and_unparseable_hrefs() {
        let html = r#"<a href="">empty</a><a href="http://[::1]:namedport">bad</a>"#;
        let links = extract_links(html, &base());
        assert!(links.is_empty());
    }

    #[test]
    fn test_no_links() {
        let links = extract_links("<html><body><p>No links here.</p></body></html>", &base());
        assert!(links.is_empty());
    }
}
