//! Search index error types.
//!
//! This module defines the error types that can occur during search index operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Validation error (e.g., empty collection name or batch).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to build the client or reach the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A batch import failed as a whole (network, timeout, rejected request).
    #[error("Submit error: {0}")]
    SubmitError(String),

    /// Failed to upsert a single document.
    #[error("Index error: {0}")]
    IndexError(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a submit error.
    pub fn submit(msg: impl Into<String>) -> Self {
        Self::SubmitError(msg.into())
    }

    /// Create an index error.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::IndexError(msg.into())
    }

    /// Create a document not found error.
    pub fn document_not_found(collection: &str, document_id: &str) -> Self {
        Self::DocumentNotFound(format!("collection={}, id={}", collection, document_id))
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether this error means the requested document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound(_))
    }
}
