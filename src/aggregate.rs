//! Concurrent fetch-and-merge.
//!
//! [`Aggregator::fetch`] spawns one tokio task per URL and drains a single
//! unbounded [`mpsc`] channel until every task has sent its completion
//! signal. Tasks push items as they go, so items from different sources
//! interleave by arrival; items from the same source keep document order.
//!
//! There is no concurrency cap, no retry and no timeout here. A timeout, if
//! wanted, is configured on the `reqwest::Client`.

use tokio::sync::mpsc;

use crate::config::AggregatorConfig;
use crate::error::{Error, Result};
use crate::source::{self, Item, SourceMsg, SourceReport};

/// Items from every source, plus one report per source.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub items: Vec<Item>,
    /// In completion order, not input order.
    pub reports: Vec<SourceReport>,
}

/// Fetches many feeds at once with a shared HTTP client.
///
/// Cloning the client is cheap, so one `Aggregator` can serve any number of
/// calls.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    client: reqwest::Client,
    config: AggregatorConfig,
}

impl Aggregator {
    /// An aggregator with a default `reqwest::Client` and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` for every request, e.g. one built with a timeout.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            config: AggregatorConfig::default(),
        }
    }

    /// Replace the aggregation settings, keeping the client.
    pub fn config(mut self, config: AggregatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetch every URL and return all items that made it through.
    ///
    /// Sources that are unreachable, answer with a non-2xx status, serve
    /// something that is not RSS, or contain unparseable dates contribute
    /// fewer items or none; they never fail the call.
    ///
    /// # Errors
    ///
    /// [`Error::NoSourcesProvided`] if `urls` is empty. Nothing is fetched in
    /// that case.
    pub async fn fetch<S: AsRef<str>>(&self, urls: &[S]) -> Result<Vec<Item>> {
        self.fetch_with_report(urls).await.map(|aggregation| aggregation.items)
    }

    /// Like [`fetch`](Self::fetch), but also says what happened to each
    /// source.
    pub async fn fetch_with_report<S: AsRef<str>>(&self, urls: &[S]) -> Result<Aggregation> {
        if urls.is_empty() {
            return Err(Error::NoSourcesProvided);
        }

        let total = urls.len();
        let (tx, mut rx) = mpsc::unbounded_channel();

        for url in urls {
            tokio::spawn(source::run(
                self.client.clone(),
                url.as_ref().to_owned(),
                self.config.bad_dates,
                tx.clone(),
            ));
        }
        // Only the tasks hold senders now, so `recv` returns `None` once they
        // are all gone.
        drop(tx);

        let mut aggregation = Aggregation {
            items: Vec::new(),
            reports: Vec::with_capacity(total),
        };
        let mut completed = 0;

        while completed < total {
            match rx.recv().await {
                Some(SourceMsg::Item(item)) => aggregation.items.push(item),
                Some(SourceMsg::Done(report)) => {
                    completed += 1;
                    aggregation.reports.push(report);
                }
                None => break,
            }
        }

        let failed = aggregation
            .reports
            .iter()
            .filter(|r| r.failure.is_some())
            .count();
        tracing::info!(
            sources = total,
            failed = failed,
            items = aggregation.items.len(),
            "Aggregation finished"
        );

        Ok(aggregation)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_input_is_a_hard_error() {
        let urls: [&str; 0] = [];

        let result = Aggregator::new().fetch(&urls).await;

        assert_eq!(result, Err(Error::NoSourcesProvided));
    }

    #[tokio::test]
    async fn empty_input_has_no_report() {
        let result = Aggregator::new().fetch_with_report(&Vec::<String>::new()).await;

        assert!(matches!(result, Err(Error::NoSourcesProvided)));
    }

    #[test]
    fn config_is_applied() {
        let aggregator = Aggregator::new().config(AggregatorConfig {
            bad_dates: crate::BadDatePolicy::SkipEntry,
        });

        assert_eq!(aggregator.config.bad_dates, crate::BadDatePolicy::SkipEntry);
    }
}
