//! Integration tests for the HTTP fetcher
//!
//! These tests use wiremock to stand up a mock HTTP server, exercising the
//! fetcher's link extraction and error classification, plus a full crawl
//! over HTTP.

use kumo::fetch::{FetchError, Fetcher, HttpFetcher};
use kumo::{crawl, normalize_url};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_page_and_extract_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{base}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#
        ),
    )
    .await;

    let fetcher = HttpFetcher::new().unwrap();
    let url = normalize_url(&format!("{base}/")).unwrap();
    let page = fetcher.fetch(url.clone()).await.unwrap();

    assert_eq!(page.url, url);
    assert!(page.body.contains("Home"));

    let paths: Vec<&str> = page.links.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/page1", "/page2"]);
}

#[tokio::test]
async fn test_http_error_status_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let url = normalize_url(&format!("{}/missing", server.uri())).unwrap();

    let result = fetcher.fetch(url).await;
    assert!(matches!(
        result,
        Err(FetchError::HttpStatus { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_non_html_content_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{}")
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let url = normalize_url(&format!("{}/data.json", server.uri())).unwrap();

    let result = fetcher.fetch(url).await;
    assert!(matches!(result, Err(FetchError::ContentType { .. })));
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/page1">Page 1</a>
            <a href="{base}/page2">Page 2</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(
        &server,
        "/page1",
        format!(r#"<html><body><a href="{base}/">Home</a></body></html>"#),
    )
    .await;
    mount_html(&server, "/page2", "<html><body>Leaf</body></html>".to_string()).await;

    let fetcher = HttpFetcher::new().unwrap();
    let mut stream = crawl(&format!("{base}/"), fetcher, 2).unwrap();

    let mut paths = HashSet::new();
    while let Some(page) = tokio::time::timeout(Duration::from_secs(10), stream.recv())
        .await
        .expect("crawl did not terminate")
    {
        paths.insert(page.url.path().to_string());
    }

    assert_eq!(
        paths,
        HashSet::from(["/".to_string(), "/page1".to_string(), "/page2".to_string()])
    );
    assert!(stream.failures().is_empty());
}

#[tokio::test]
async fn test_crawl_reports_broken_link() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/ok">Ok</a>
            <a href="{base}/gone">Gone</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(&server, "/ok", "<html><body>Ok</body></html>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new().unwrap();
    let mut stream = crawl(&format!("{base}/"), fetcher, 1).unwrap();

    let mut pages = Vec::new();
    while let Some(page) = tokio::time::timeout(Duration::from_secs(10), stream.recv())
        .await
        .expect("crawl did not terminate")
    {
        pages.push(page);
    }

    assert_eq!(pages.len(), 2);
    let failures = stream.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].url.path(), "/gone");
    assert!(matches!(
        failures[0].error,
        FetchError::HttpStatus { status: 404, .. }
    ));
}
