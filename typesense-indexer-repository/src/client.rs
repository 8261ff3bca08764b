//! Search index client implementation.
//!
//! This module provides the main client for interacting with the search index.
//! Application code uses this to import batches, upsert, fetch, and search
//! documents; it validates inputs before anything reaches the provider.

use std::sync::Arc;

use crate::errors::SearchIndexError;
use crate::interfaces::IndexProvider;
use crate::types::BatchOutcome;
use typesense_indexer_shared::{Record, SearchRequest, SearchResult};

/// The main client for interacting with the search index.
#[derive(Clone)]
pub struct SearchIndexClient {
    provider: Arc<dyn IndexProvider>,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient over the given provider.
    pub fn new(provider: Arc<dyn IndexProvider>) -> Self {
        Self { provider }
    }

    fn validate_collection(collection: &str) -> Result<(), SearchIndexError> {
        if collection.trim().is_empty() {
            return Err(SearchIndexError::validation("collection is required"));
        }
        Ok(())
    }

    /// Bind this client to a collection for the duration of a run.
    pub fn collection(&self, name: impl Into<String>) -> Result<CollectionHandle, SearchIndexError> {
        let name = name.into();
        Self::validate_collection(&name)?;
        Ok(CollectionHandle {
            name: Arc::from(name),
            client: self.clone(),
        })
    }

    /// Submit a batch of records with upsert semantics.
    /// Input: collection name (non-empty), batch (non-empty)
    /// Output: Result<BatchOutcome, SearchIndexError>
    pub async fn submit_batch(
        &self,
        collection: &str,
        batch: &[Record],
    ) -> Result<BatchOutcome, SearchIndexError> {
        Self::validate_collection(collection)?;
        if batch.is_empty() {
            return Err(SearchIndexError::validation("batch must not be empty"));
        }

        self.provider.import_documents(collection, batch).await
    }

    /// Upsert exactly one record.
    pub async fn upsert(
        &self,
        collection: &str,
        document: &Record,
    ) -> Result<Record, SearchIndexError> {
        Self::validate_collection(collection)?;
        self.provider.upsert_document(collection, document).await
    }

    /// Fetch one record by id.
    pub async fn get(&self, collection: &str, document_id: &str) -> Result<Record, SearchIndexError> {
        Self::validate_collection(collection)?;
        if document_id.is_empty() {
            return Err(SearchIndexError::validation("document id is required"));
        }
        self.provider.get_document(collection, document_id).await
    }

    /// Query the search index.
    pub async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchIndexError> {
        Self::validate_collection(collection)?;
        if request.query_by.trim().is_empty() {
            return Err(SearchIndexError::validation("query_by is required"));
        }
        self.provider.search(collection, request).await
    }

    /// Check if the search engine is healthy.
    pub async fn health_check(&self) -> Result<bool, SearchIndexError> {
        self.provider.health_check().await
    }
}

/// A collection name bound to a connected client.
///
/// Cheap to clone; every concurrently running batch submission holds one.
#[derive(Clone)]
pub struct CollectionHandle {
    name: Arc<str>,
    client: SearchIndexClient,
}

impl CollectionHandle {
    /// Name of the target collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Submit a batch to this collection.
    pub async fn submit_batch(&self, batch: &[Record]) -> Result<BatchOutcome, SearchIndexError> {
        self.client.submit_batch(&self.name, batch).await
    }
}
