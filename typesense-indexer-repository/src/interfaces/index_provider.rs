//! Index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (Typesense, in-memory mocks, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::BatchOutcome;
use typesense_indexer_shared::{Record, SearchRequest, SearchResult};

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into `SearchIndexClient` to enable dependency
/// injection and easy testing with mock implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: a single provider is shared by
/// every batch submission running concurrently during a bulk ingest.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// Upsert a batch of records into a collection in one request.
    ///
    /// Each record replaces any existing record with the same `id`, or is
    /// inserted if absent. Records are applied independently; per-record
    /// rejections are reported in the returned outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOutcome)` - The backend answered; contains per-record results
    /// * `Err(SearchIndexError::SubmitError)` - Network failure, timeout, or the
    ///   request was rejected as a whole
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Record],
    ) -> Result<BatchOutcome, SearchIndexError>;

    /// Upsert a single record.
    ///
    /// # Returns
    ///
    /// * `Ok(Record)` - The document as stored by the backend
    /// * `Err(SearchIndexError)` - If the upsert fails
    async fn upsert_document(
        &self,
        collection: &str,
        document: &Record,
    ) -> Result<Record, SearchIndexError>;

    /// Fetch a single record by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Record)` - The stored document
    /// * `Err(SearchIndexError::DocumentNotFound)` - If no document has that id
    /// * `Err(SearchIndexError)` - If the request fails
    async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Record, SearchIndexError>;

    /// Execute a search against a collection.
    async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
