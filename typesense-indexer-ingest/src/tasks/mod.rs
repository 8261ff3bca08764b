//! One-shot tasks against a collection.
//!
//! Each task performs a single request: fetch one document, upsert one
//! document, or run one (facet) search and store the result.

mod document_get;
mod document_index;
mod search;

use std::fmt;
use std::str::FromStr;

pub use document_get::DocumentGet;
pub use document_index::DocumentIndex;
pub use search::SearchTask;

/// What a get does when the requested document does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingDocumentPolicy {
    /// Return [`crate::IngestError::NotFound`].
    #[default]
    Fail,
    /// Log a warning and return no document.
    Warn,
}

impl FromStr for MissingDocumentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "warn" => Ok(Self::Warn),
            other => Err(format!(
                "unknown missing document policy `{}`, expected `fail` or `warn`",
                other
            )),
        }
    }
}

impl fmt::Display for MissingDocumentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("fail"),
            Self::Warn => f.write_str("warn"),
        }
    }
}
