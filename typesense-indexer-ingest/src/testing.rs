//! In-memory index provider shared by the ingest tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use typesense_indexer_repository::{BatchOutcome, IndexProvider, RecordOutcome, SearchIndexError};
use typesense_indexer_shared::{record_id, Record, SearchRequest, SearchResult};

/// Provider keeping documents in memory with upsert-by-id semantics.
///
/// Records without an `id` are rejected individually, the way Typesense
/// rejects invalid documents inside an import.
#[derive(Default)]
pub struct InMemoryProvider {
    collections: Mutex<HashMap<String, BTreeMap<String, Record>>>,
    import_sizes: Mutex<Vec<usize>>,
    searches: Mutex<Vec<SearchRequest>>,
    fail_on_import: Option<usize>,
    fail_delay: Duration,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`-th import call (1-based) with a submit error.
    pub fn failing_on_import(n: usize) -> Self {
        Self {
            fail_on_import: Some(n),
            ..Self::default()
        }
    }

    /// Fail the `n`-th import call only after `delay`, while every other call
    /// answers at once.
    pub fn failing_slowly_on_import(n: usize, delay: Duration) -> Self {
        Self {
            fail_on_import: Some(n),
            fail_delay: delay,
            ..Self::default()
        }
    }

    /// Every search request received, in arrival order.
    pub fn searches(&self) -> Vec<SearchRequest> {
        self.searches.lock().unwrap().clone()
    }

    /// Sizes of every import call received, in arrival order.
    pub fn import_sizes(&self) -> Vec<usize> {
        self.import_sizes.lock().unwrap().clone()
    }

    /// Documents currently stored in a collection, ordered by id.
    pub fn documents(&self, collection: &str) -> Vec<Record> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    fn store(&self, collection: &str, document: &Record) -> Option<String> {
        let id = record_id(document)?;
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document.clone());
        Some(id)
    }
}

#[async_trait]
impl IndexProvider for InMemoryProvider {
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Record],
    ) -> Result<BatchOutcome, SearchIndexError> {
        let call = {
            let mut sizes = self.import_sizes.lock().unwrap();
            sizes.push(documents.len());
            sizes.len()
        };
        if self.fail_on_import == Some(call) {
            if !self.fail_delay.is_zero() {
                tokio::time::sleep(self.fail_delay).await;
            }
            return Err(SearchIndexError::submit(format!(
                "Import failed with status 503: batch {} rejected",
                call
            )));
        }

        let results = documents
            .iter()
            .map(|document| match self.store(collection, document) {
                Some(id) => RecordOutcome {
                    id: Some(id),
                    success: true,
                    error: None,
                },
                None => RecordOutcome {
                    id: None,
                    success: false,
                    error: Some("Document is missing an `id`.".to_string()),
                },
            })
            .collect();

        Ok(BatchOutcome::from_results(results))
    }

    async fn upsert_document(
        &self,
        collection: &str,
        document: &Record,
    ) -> Result<Record, SearchIndexError> {
        self.store(collection, document)
            .map(|_| document.clone())
            .ok_or_else(|| SearchIndexError::index("Document is missing an `id`."))
    }

    async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Record, SearchIndexError> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(document_id))
            .cloned()
            .ok_or_else(|| SearchIndexError::document_not_found(collection, document_id))
    }

    async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchIndexError> {
        self.searches.lock().unwrap().push(request.clone());
        let fields: Vec<&str> = request.query_by.split(',').map(str::trim).collect();
        let hits: Vec<serde_json::Value> = self
            .documents(collection)
            .into_iter()
            .filter(|doc| {
                fields.iter().any(|field| {
                    doc.get(*field)
                        .and_then(|v| v.as_str())
                        .is_some_and(|v| v.contains(&request.query))
                })
            })
            .map(|doc| serde_json::json!({ "document": doc }))
            .collect();

        let mut result = SearchResult::empty();
        result.found = hits.len() as u64;
        result.hits = hits;
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }
}
