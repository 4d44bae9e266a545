//! OPML subscription import.
//!
//! Every `<outline>` carrying an `xmlUrl` becomes a feed, at any nesting
//! depth.  The feed is named after the outline's `title`, falling back to
//! `text`, with spaces turned into dashes so the name works as a directory.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{error, info};

use crate::config::Config;
use crate::error::OpmlError;

/// One subscription found in an OPML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpmlFeed {
    pub name: String,
    pub url: String,
}

/// Read an OPML document from a local file, or fetch it when the argument is
/// an HTTP(S) URL rather than a readable file.
pub async fn load(location: &str) -> Result<String, OpmlError> {
    match tokio::fs::read_to_string(location).await {
        Ok(text) => Ok(text),
        Err(e) if !is_url(location) => Err(e.into()),
        Err(_) => Ok(reqwest::get(location)
            .await?
            .error_for_status()?
            .text()
            .await?),
    }
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Extract subscriptions, in document order.
pub fn parse(xml: &str) -> Result<Vec<OpmlFeed>, OpmlError> {
    let mut reader = Reader::from_str(xml);
    let mut feeds = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"outline" => {
                if let Some(feed) = outline_feed(&e)? {
                    feeds.push(feed);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(OpmlError::Xml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(feeds)
}

fn outline_feed(outline: &BytesStart) -> Result<Option<OpmlFeed>, OpmlError> {
    let mut title = None;
    let mut text = None;
    let mut url = None;

    for attr in outline.attributes() {
        let attr = attr.map_err(|e| OpmlError::Xml(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| OpmlError::Xml(e.to_string()))?
            .trim()
            .to_string();
        match attr.key.as_ref() {
            b"title" => title = Some(value),
            b"text" => text = Some(value),
            b"xmlUrl" => url = Some(value),
            _ => {}
        }
    }

    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    let Some(name) = title
        .filter(|t| !t.is_empty())
        .or(text.filter(|t| !t.is_empty()))
    else {
        return Ok(None);
    };

    Ok(Some(OpmlFeed {
        name: name.replace(' ', "-"),
        url,
    }))
}

/// Add every feed to the configuration.  Failures (duplicates, blank
/// values, write errors) are logged and do not stop the import.
///
/// Returns how many feeds were added.
pub fn import(config: &mut Config, feeds: &[OpmlFeed]) -> usize {
    let mut added = 0;
    for feed in feeds {
        match config.add_feed(&feed.name, &feed.url) {
            Ok(()) => added += 1,
            Err(e) => error!(feed = %feed.name, error = %e, "failed to add feed"),
        }
    }
    info!(added, found = feeds.len(), "OPML import finished");
    added
}
