use thiserror::Error;

/// Errors surfaced to the caller of an aggregation.
///
/// Per-source problems never show up here; see
/// [`SourceError`](crate::SourceError) for those.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("no feed sources were provided")]
    NoSourcesProvided,
}

pub type Result<T> = std::result::Result<T, Error>;
