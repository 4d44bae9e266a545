//! RSS 2.0 conversion.
//!
//! Use this module as the template when adding another format: a pure
//! function from the parsed document to `Vec<FetchedItem>`, tested against
//! inline documents without touching the network.

use super::FetchedItem;

/// Convert an already-parsed [`rss::Channel`] into [`FetchedItem`]s, in
/// document order.
///
/// The `pubDate` text is kept verbatim; RSS dates are already meant for
/// display and reformatting would only lose the feed's own timezone label.
pub fn parse_channel(channel: &rss::Channel) -> Vec<FetchedItem> {
    channel
        .items()
        .iter()
        .map(|item| FetchedItem {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            description: item.description().unwrap_or_default().to_string(),
            content: item.content().unwrap_or_default().to_string(),
            published: item
                .pub_date()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
