//! RSS document decoding.
//!
//! Turns a response body into a [`RawFeed`]: the channel title plus the
//! entries in document order, with every field still a plain string. The
//! XML itself is decoded by the [`rss`] crate; nothing here touches the
//! network or interprets timestamps.

use thiserror::Error;

/// The body is not a recognizable RSS document.
#[derive(Debug, Error)]
#[error("malformed feed document: {0}")]
pub struct MalformedDocument(#[from] rss::Error);

/// A decoded feed before any date has been looked at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeed {
    /// `rss/channel/title`.
    pub title: String,
    /// `rss/channel/item`, in document order.
    pub entries: Vec<RawEntry>,
}

/// One `<item>`. Missing elements decode to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

/// Decode an RSS 2.0 document.
///
/// Only the channel title and the item title, description, link and pubDate
/// are kept; other elements and extension namespaces are ignored.
pub fn parse_document(bytes: &[u8]) -> Result<RawFeed, MalformedDocument> {
    let channel = rss::Channel::read_from(bytes)?;

    let entries = channel
        .items()
        .iter()
        .map(|item| RawEntry {
            title: item.title().unwrap_or_default().to_string(),
            description: item.description().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            pub_date: item.pub_date().unwrap_or_default().to_string(),
        })
        .collect();

    Ok(RawFeed {
        title: channel.title().to_string(),
        entries,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
