//! Error types for the Typesense indexer ingest.

use thiserror::Error;
use typesense_indexer_repository::SearchIndexError;

/// Errors that can occur in the Typesense indexer ingest.
#[derive(Error, Debug)]
pub enum IngestError {
    /// A source line could not be decoded as a record.
    #[error("Decode error at line {line}: {message}")]
    DecodeError { line: u64, message: String },

    /// A batch could not be submitted; the run was aborted.
    ///
    /// `records_read` is diagnostic context only, not a committed count.
    #[error("Submit error after {records_read} records read: {source}")]
    SubmitError {
        records_read: u64,
        #[source]
        source: SearchIndexError,
    },

    /// A requested document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Error from the search index outside of batch submission.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// The source could not be read or the result could not be written.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl IngestError {
    /// Create a decode error.
    pub fn decode(line: u64, msg: impl Into<String>) -> Self {
        Self::DecodeError {
            line,
            message: msg.into(),
        }
    }

    /// Create a submit error.
    pub fn submit(records_read: u64, source: SearchIndexError) -> Self {
        Self::SubmitError {
            records_read,
            source,
        }
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}
