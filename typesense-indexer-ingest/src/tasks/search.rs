use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::storage::Storage;
use typesense_indexer_repository::{SearchIndexClient, SearchIndexError};
use typesense_indexer_shared::{SearchOutput, SearchRequest};

/// Runs one search and writes the full response to storage.
pub struct SearchTask {
    client: SearchIndexClient,
    storage: Arc<dyn Storage>,
}

impl SearchTask {
    pub fn new(client: SearchIndexClient, storage: Arc<dyn Storage>) -> Self {
        Self { client, storage }
    }

    /// Search `collection` and store the result as one JSON line.
    #[instrument(skip(self, request), fields(q = %request.query, query_by = %request.query_by))]
    pub async fn run(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<SearchOutput, IngestError> {
        let result = self.client.search(collection, request).await?;

        let mut line = serde_json::to_vec(&result)
            .map_err(|e| IngestError::storage(format!("Failed to encode search result: {}", e)))?;
        line.push(b'\n');
        let result_uri = self.storage.put(line, "json").await?;

        info!(collection, total_hits = result.found, result_uri = %result_uri, "Search result stored");

        Ok(SearchOutput {
            result_uri,
            total_hits: result.found,
        })
    }

    /// Same as [`SearchTask::run`] with facet counts over `facet_by`.
    pub async fn run_facets(
        &self,
        collection: &str,
        request: SearchRequest,
        facet_by: &str,
    ) -> Result<SearchOutput, IngestError> {
        if facet_by.trim().is_empty() {
            return Err(SearchIndexError::validation("facet_by is required for a facet search").into());
        }
        self.run(collection, &request.with_facet_by(facet_by)).await
    }
}
