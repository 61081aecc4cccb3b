//! The record handed back to callers.
//!
//! Every source converts its raw entries into `Item`s; an `Item` only exists
//! once its publish date has been normalized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single feed entry with a normalized publish date.
///
/// Field names double as the serialized names, so an `Item` can be written
/// straight to JSON (or any other serde format) for an exchange layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Entry headline.
    pub title: String,

    /// Title of the channel the entry came from (e.g. "BBC News").
    pub source: String,

    /// The URL that was queried to get this entry.
    pub source_url: String,

    /// Link to the full content.
    pub link: String,

    /// Publication time, normalized to UTC.
    pub publish_date: DateTime<Utc>,

    /// Entry summary or body.
    pub description: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
