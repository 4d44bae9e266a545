//! The item type shared by every feed format.
//!
//! `FetchedItem` is what a fetcher hands to the update engine: one entry of a
//! feed document, already decoded into plain strings.  Each format module
//! converts its native items into this struct so the engine never needs to
//! know whether a feed was RSS or Atom.

/// A single feed entry, normalised from any feed format.
///
/// Missing text fields are empty strings rather than `Option`s because the
/// article file writes them as empty lines anyway.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FetchedItem {
    /// Headline, used to derive the article's file name.
    pub title: String,

    /// URL of the full content.
    pub link: String,

    /// Summary text.
    pub description: String,

    /// Full body, when the feed carries one (`content:encoded` in RSS,
    /// `<content>` in Atom).
    pub content: String,

    /// Publication timestamp as a displayable string.
    ///
    /// RSS keeps the feed's own `pubDate` text; Atom dates are rendered as
    /// RFC 3339.  `None` when the feed gave no date.
    pub published: Option<String>,
}

impl FetchedItem {
    /// The text stored in the article file: description, link, published
    /// date and body, one per line, in that order.
    pub fn article_content(&self) -> String {
        [
            self.description.as_str(),
            self.link.as_str(),
            self.published.as_deref().unwrap_or(""),
            self.content.as_str(),
        ]
        .join("\n")
    }
}
