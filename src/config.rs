//! Aggregation settings.
//!
//! There is no config file; callers build an [`AggregatorConfig`] directly or
//! deserialize it from their own settings. Any subset of keys can be given.
//! Transport settings (timeouts, proxies, TLS) belong to the
//! `reqwest::Client` handed to [`Aggregator::with_client`](crate::Aggregator::with_client).

use serde::{Deserialize, Serialize};

/// What a source does when an entry's publish date cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadDatePolicy {
    /// Stop reading the source at the offending entry. Entries after it are
    /// dropped even when their dates are fine.
    #[default]
    StopSource,
    /// Drop only the offending entry and keep going.
    ///
    /// This departs from the historical behavior and has to be asked for.
    SkipEntry,
}

/// Settings for an [`Aggregator`](crate::Aggregator).
///
/// Missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Handling of entries whose publish date does not parse.
    pub bad_dates: BadDatePolicy,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
