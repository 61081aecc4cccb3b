//! Everything that happens inside a single source.
//!
//! - [`document`] decodes an RSS body into raw, unvalidated entries.
//! - [`task`] runs one source end to end and reports back to the aggregator.
//! - [`Item`] is what a source produces for the caller.
//!
//! A source never fails loudly. Whatever goes wrong, the worst outcome is that
//! it contributes fewer items (possibly none), and the reason is recorded in
//! its [`SourceReport`].

mod document;
mod item;
mod task;

pub use document::{parse_document, MalformedDocument, RawEntry, RawFeed};
pub use item::Item;
pub use task::{SourceError, SourceReport};

pub(crate) use task::{run, SourceMsg};
