//! The per-source unit of work.
//!
//! One task per URL: fetch, decode, normalize dates, and push items to the
//! aggregator over the shared channel. Every problem is a soft failure that
//! only shortens this source's output. Whatever happens, the task ends with
//! exactly one [`SourceMsg::Done`].

use thiserror::Error;
use tokio::sync::mpsc;

use super::document::{parse_document, MalformedDocument, RawFeed};
use super::Item;
use crate::config::BadDatePolicy;
use crate::date::{self, DateFormatUnrecognized};

/// Why a source contributed fewer items than it might have.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network-level failure: DNS, connection, TLS, body read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response status outside 200..=299.
    #[error("HTTP error: status {0}")]
    Status(u16),
    #[error(transparent)]
    Document(#[from] MalformedDocument),
    /// An entry's date did not parse and the source was cut short there.
    #[error("entry {index}: {error}")]
    Date {
        index: usize,
        #[source]
        error: DateFormatUnrecognized,
    },
    /// The task stopped before reaching a terminal step (panic or runtime
    /// shutdown).
    #[error("source task aborted")]
    Aborted,
}

/// Outcome of one source, delivered with its completion signal.
#[derive(Debug, Default)]
pub struct SourceReport {
    /// The URL as given by the caller.
    pub url: String,
    /// Items emitted.
    pub items: usize,
    /// Entries in the document that did not become items.
    pub skipped: usize,
    /// `None` when the source was processed to the end.
    pub failure: Option<SourceError>,
}

/// Messages sent from source tasks to the aggregator.
#[derive(Debug)]
pub(crate) enum SourceMsg {
    Item(Item),
    /// Last message a task sends.
    Done(SourceReport),
}

/// Sends the completion signal when dropped, so it goes out on every exit
/// path, unwinding included.
struct Completion {
    tx: mpsc::UnboundedSender<SourceMsg>,
    report: SourceReport,
}

impl Completion {
    fn new(url: &str, tx: mpsc::UnboundedSender<SourceMsg>) -> Self {
        Self {
            tx,
            report: SourceReport {
                url: url.to_owned(),
                failure: Some(SourceError::Aborted),
                ..SourceReport::default()
            },
        }
    }

    fn finish(mut self, result: Result<(), SourceError>) {
        self.report.failure = result.err();
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        let report = std::mem::take(&mut self.report);
        match &report.failure {
            None => tracing::debug!(
                url = %report.url,
                items = report.items,
                skipped = report.skipped,
                "Source finished"
            ),
            Some(e) => tracing::warn!(
                url = %report.url,
                items = report.items,
                skipped = report.skipped,
                error = %e,
                "Source failed, keeping what it produced"
            ),
        }
        // A closed channel means the aggregation was dropped; nobody is
        // waiting for this signal anymore.
        let _ = self.tx.send(SourceMsg::Done(report));
    }
}

/// Process one source to completion. Never fails; see [`SourceReport`].
pub(crate) async fn run(
    client: reqwest::Client,
    url: String,
    bad_dates: BadDatePolicy,
    tx: mpsc::UnboundedSender<SourceMsg>,
) {
    let mut completion = Completion::new(&url, tx.clone());
    let result = emit_items(&client, &url, bad_dates, &tx, &mut completion.report).await;
    completion.finish(result);
}

async fn emit_items(
    client: &reqwest::Client,
    url: &str,
    bad_dates: BadDatePolicy,
    tx: &mpsc::UnboundedSender<SourceMsg>,
    report: &mut SourceReport,
) -> Result<(), SourceError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    let RawFeed { title, entries } = parse_document(&body)?;
    let total = entries.len();

    for (index, entry) in entries.into_iter().enumerate() {
        let publish_date = match date::normalize(&entry.pub_date) {
            Ok(date) => date,
            Err(error) => match bad_dates {
                BadDatePolicy::StopSource => {
                    report.skipped += total - index;
                    return Err(SourceError::Date { index, error });
                }
                BadDatePolicy::SkipEntry => {
                    tracing::debug!(url = %url, index, error = %error, "Skipping entry with bad date");
                    report.skipped += 1;
                    continue;
                }
            },
        };

        let item = Item {
            title: entry.title,
            source: title.clone(),
            source_url: url.to_owned(),
            link: entry.link,
            publish_date,
            description: entry.description,
        };
        if tx.send(SourceMsg::Item(item)).is_err() {
            // aggregator gone
            return Ok(());
        }
        report.items += 1;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
