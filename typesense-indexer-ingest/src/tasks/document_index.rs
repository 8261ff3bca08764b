use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::metrics::{MetricsSink, RECORDS};
use typesense_indexer_repository::SearchIndexClient;
use typesense_indexer_shared::{record_id, Record};

/// Upserts exactly one document.
pub struct DocumentIndex {
    client: SearchIndexClient,
    metrics: Arc<dyn MetricsSink>,
}

impl DocumentIndex {
    pub fn new(client: SearchIndexClient, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { client, metrics }
    }

    /// Upsert `document` into `collection` and count it.
    #[instrument(skip(self, document), fields(id = ?record_id(&document)))]
    pub async fn run(&self, collection: &str, document: Record) -> Result<Record, IngestError> {
        let stored = self.client.upsert(collection, &document).await?;
        self.metrics.counter(RECORDS, 1);
        info!(collection, "Document indexed");
        Ok(stored)
    }
}
