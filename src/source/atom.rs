//! Atom conversion.

use super::FetchedItem;

/// Convert an already-parsed Atom feed into [`FetchedItem`]s, in document
/// order.
///
/// Atom has no single "link" field, so the first `<link>` wins.  Entries
/// without `<published>` fall back to the mandatory `<updated>`.
pub fn parse_feed(feed: &atom_syndication::Feed) -> Vec<FetchedItem> {
    feed.entries()
        .iter()
        .map(|entry| FetchedItem {
            title: entry.title().as_str().to_string(),
            link: entry
                .links()
                .first()
                .map(|l| l.href().to_string())
                .unwrap_or_default(),
            description: entry
                .summary()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            content: entry
                .content()
                .and_then(|c| c.value())
                .unwrap_or_default()
                .to_string(),
            published: Some(entry.published().unwrap_or(entry.updated()).to_rfc3339()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_feed_maps_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Feed</title>
  <id>urn:feed</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Published Entry</title>
    <id>urn:entry:1</id>
    <updated>2024-01-03T00:00:00Z</updated>
    <published>2024-01-02T10:30:00Z</published>
    <link href="https://example.com/1"/>
    <link rel="alternate" href="https://example.com/1/alt"/>
    <summary>Summary text</summary>
    <content type="text">Body text</content>
  </entry>
  <entry>
    <title>Updated Only</title>
    <id>urn:entry:2</id>
    <updated>2024-01-04T00:00:00Z</updated>
  </entry>
</feed>"#;

        let feed = atom_syndication::Feed::read_from(xml.as_bytes()).unwrap();
        let items = parse_feed(&feed);

        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "Published Entry");
        assert_eq!(items[0].link, "https://example.com/1");
        assert_eq!(items[0].description, "Summary text");
        assert_eq!(items[0].content, "Body text");
        assert_eq!(
            items[0].published.as_deref(),
            Some("2024-01-02T10:30:00+00:00")
        );

        assert_eq!(items[1].link, "");
        assert_eq!(
            items[1].published.as_deref(),
            Some("2024-01-04T00:00:00+00:00")
        );
    }
}
