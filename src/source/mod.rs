//! Feed fetching.
//!
//! This module defines the [`FeedFetcher`] trait, the collaborator the update
//! engine uses to turn a feed URL into a list of [`FetchedItem`]s, and
//! [`HttpFetcher`], the implementation used by the command line.  Format
//! specific conversion lives in sub-modules ([`rss`] and [`atom`]).
//!
//! ## For contributors — adding a new format
//!
//! 1. Create a new file in this directory (e.g. `json_feed.rs`).
//! 2. Write a pure function converting the parsed document into
//!    `Vec<FetchedItem>`.
//! 3. Add `mod json_feed;` below and try it in [`parse_document`] after the
//!    existing formats.
//!
//! The engine and the coordinator are format-agnostic.

pub mod atom;
mod feed_item;
pub mod rss;

pub use feed_item::FetchedItem;

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Anything that can turn a feed URL into items.
///
/// The engine calls [`fetch()`](FeedFetcher::fetch) once per source per run,
/// concurrently across sources, so implementations must be shareable between
/// tasks.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and parse the document at `url`.
    ///
    /// Items must be returned in document order.  Any error aborts the update
    /// of that one source.
    async fn fetch(&self, url: &str) -> Result<Vec<FetchedItem>>;
}

/// How long a single feed request may take.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches feeds over HTTP and parses them as RSS or Atom.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rssnix/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FetchedItem>> {
        debug!(url, "fetching feed");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_document(&body)
    }
}

/// Parse a feed document, trying RSS first and then Atom.
pub fn parse_document(body: &[u8]) -> Result<Vec<FetchedItem>> {
    let rss_err = match ::rss::Channel::read_from(body) {
        Ok(channel) => return Ok(rss::parse_channel(&channel)),
        Err(e) => e,
    };
    debug!(error = %rss_err, "not an RSS document, trying Atom");

    match atom_syndication::Feed::read_from(body) {
        Ok(feed) => Ok(atom::parse_feed(&feed)),
        Err(atom_err) => Err(anyhow!(
            "not a valid RSS or Atom document (RSS: {rss_err}; Atom: {atom_err})"
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>First Post</title>
      <link>https://example.com/1</link>
      <description>First description</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:feed</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <id>urn:entry:1</id>
    <updated>2024-01-02T00:00:00Z</updated>
    <link href="https://example.com/atom/1"/>
  </entry>
</feed>"#;

    #[test]
    fn parse_document_accepts_rss() {
        let items = parse_document(RSS.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First Post");
    }

    #[test]
    fn parse_document_falls_back_to_atom() {
        let items = parse_document(ATOM.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Atom Entry");
        assert_eq!(items[0].link, "https://example.com/atom/1");
    }

    #[test]
    fn parse_document_rejects_garbage() {
        let err = parse_document(b"<html><body>nope</body></html>").unwrap_err();
        assert!(err.to_string().contains("RSS or Atom"));
    }

    #[tokio::test]
    async fn http_fetcher_fetches_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let items = fetcher
            .fetch(&format!("{}/feed.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://example.com/1");
    }

    #[tokio::test]
    async fn http_fetcher_treats_error_status_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        assert!(fetcher.fetch(&server.uri()).await.is_err());
    }
}
