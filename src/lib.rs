//! feed-merge: fetch many RSS feeds at once and merge their items.
//!
//! ## Architecture overview
//!
//! ```text
//!              spawn (one per URL)          SourceMsg::Item / ::Done
//! ┌───────────┐ ───────────────► ┌───────────┐ ─────────────────► ┌───────────┐
//! │ aggregate │                  │ source::  │     (channel)      │ aggregate │
//! │ (fan-out) │                  │   task    │                    │ (fan-in)  │
//! └───────────┘                  └───────────┘                    └───────────┘
//!                                  │       │
//!                     parse_document       date::normalize
//! ```
//!
//! * **`aggregate`**: spawns the tasks and collects their messages until
//!   every source has reported completion.
//! * **`source`**: the per-URL task, RSS decoding, and the [`Item`] type.
//! * **`date`**: turns the many timestamp spellings found in feeds into UTC.
//! * **`config`**: the few knobs an aggregation has.
//!
//! Broken sources are tolerated: the only error [`fetch`] returns is
//! [`Error::NoSourcesProvided`]. Use
//! [`Aggregator::fetch_with_report`] to find out what went wrong per source.
//!
//! ```no_run
//! # async fn demo() -> Result<(), feed_merge::Error> {
//! let items = feed_merge::fetch(&[
//!     "https://feeds.bbci.co.uk/news/rss.xml",
//!     "https://www.theguardian.com/world/rss",
//! ])
//! .await?;
//!
//! for item in &items {
//!     println!("{} [{}] {}", item.publish_date, item.source, item.title);
//! }
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod config;
pub mod date;
mod error;
pub mod source;

pub use aggregate::{Aggregation, Aggregator};
pub use config::{AggregatorConfig, BadDatePolicy};
pub use date::DateFormatUnrecognized;
pub use error::{Error, Result};
pub use source::{Item, MalformedDocument, SourceError, SourceReport};

/// Fetch `urls` with a default [`Aggregator`].
///
/// Must be called from within a tokio runtime.
pub async fn fetch<S: AsRef<str>>(urls: &[S]) -> Result<Vec<Item>> {
    Aggregator::new().fetch(urls).await
}
