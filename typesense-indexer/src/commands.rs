//! Dispatch of a validated task to the ingest crate.

use serde_json::{json, Value};
use tracing::info;

use crate::config::{Dependencies, Settings, Task};
use crate::IndexingError;
use typesense_indexer_ingest::{BulkIndexer, DocumentGet, DocumentIndex, SearchTask};
use typesense_indexer_shared::SearchOutput;

/// Run the selected task.
///
/// Returns the JSON value to print, or `None` when the task only logs.
pub async fn execute(deps: &Dependencies, settings: &Settings) -> Result<Option<Value>, IndexingError> {
    let collection = settings.collection.as_str();

    match &settings.task {
        Task::BulkIndex { source, config } => {
            deps.verify_connection().await?;
            let indexer = BulkIndexer::with_config(
                deps.storage.clone(),
                deps.client.clone(),
                deps.metrics.clone(),
                config.clone(),
            );
            let result = indexer.run(source, collection).await?;
            Ok(Some(json!({
                "records_read": result.records_read,
                "batches_submitted": result.batches_submitted,
            })))
        }
        Task::Get { id } => {
            let document = DocumentGet::new(deps.client.clone(), settings.missing_document)
                .run(collection, id)
                .await?;
            Ok(Some(document.map(Value::Object).unwrap_or(Value::Null)))
        }
        Task::Index { document } => {
            DocumentIndex::new(deps.client.clone(), deps.metrics.clone())
                .run(collection, document.clone())
                .await?;
            info!(collection, "Index task finished");
            Ok(None)
        }
        Task::Search { request } => {
            let output = SearchTask::new(deps.client.clone(), deps.storage.clone())
                .run(collection, request)
                .await?;
            Ok(Some(output_json(output)))
        }
        Task::FacetSearch { request, facet_by } => {
            let output = SearchTask::new(deps.client.clone(), deps.storage.clone())
                .run_facets(collection, request.clone(), facet_by)
                .await?;
            Ok(Some(output_json(output)))
        }
    }
}

fn output_json(output: SearchOutput) -> Value {
    json!({
        "result_uri": output.result_uri,
        "total_hits": output.total_hits,
    })
}
