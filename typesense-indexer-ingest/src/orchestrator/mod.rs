//! Orchestrator module for the Typesense indexer ingest.
//!
//! Coordinates the decoder, batcher, and index client for one bulk run.

use std::fmt;
use std::pin::pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::{stream, StreamExt};
use tracing::{debug, error, info, instrument, warn};

use crate::batcher::{Batcher, DEFAULT_BATCH_SIZE};
use crate::decoder::RecordDecoder;
use crate::errors::IngestError;
use crate::metrics::{MetricsSink, RECORDS, REQUESTS_COUNT};
use crate::storage::Storage;
use typesense_indexer_repository::{BatchOutcome, SearchIndexClient, SearchIndexError};
use typesense_indexer_shared::IngestResult;

/// Configuration for the bulk indexer.
#[derive(Debug, Clone)]
pub struct BulkIndexConfig {
    /// Number of records per batch.
    pub batch_size: usize,
    /// Maximum number of batch submissions in flight at once.
    pub max_in_flight: usize,
}

impl Default for BulkIndexConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_in_flight: 4,
        }
    }
}

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestState {
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Streaming => "streaming",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of one batch submission.
struct Submission {
    batch_number: u64,
    size: usize,
    outcome: Result<BatchOutcome, SearchIndexError>,
}

/// Streams records from storage into a collection.
///
/// The orchestrator:
/// - Opens the source and decodes it lazily
/// - Forms batches and submits them with at most `max_in_flight` outstanding
/// - Aborts on the first decode or submit failure, cancelling in-flight batches
/// - Reports the final counters to the metrics sink
pub struct BulkIndexer {
    storage: Arc<dyn Storage>,
    client: SearchIndexClient,
    metrics: Arc<dyn MetricsSink>,
    config: BulkIndexConfig,
}

impl BulkIndexer {
    /// Create a new bulk indexer with default configuration.
    pub fn new(
        storage: Arc<dyn Storage>,
        client: SearchIndexClient,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self::with_config(storage, client, metrics, BulkIndexConfig::default())
    }

    /// Create a new bulk indexer with custom configuration.
    pub fn with_config(
        storage: Arc<dyn Storage>,
        client: SearchIndexClient,
        metrics: Arc<dyn MetricsSink>,
        config: BulkIndexConfig,
    ) -> Self {
        Self {
            storage,
            client,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> &BulkIndexConfig {
        &self.config
    }

    /// Run a bulk ingest with the configured batch size.
    pub async fn run(&self, source: &str, collection: &str) -> Result<IngestResult, IngestError> {
        self.run_with_batch_size(source, collection, self.config.batch_size)
            .await
    }

    /// Run a bulk ingest of `source` into `collection`.
    ///
    /// Submissions resolve in the order their batches were formed, so a batch
    /// is never formed more than `max_in_flight - 1` batches past one that is
    /// still unresolved. Counters are only returned, and only reported to the
    /// metrics sink, when the whole source was read and every batch was
    /// acknowledged.
    #[instrument(skip(self), fields(max_in_flight = self.config.max_in_flight))]
    pub async fn run_with_batch_size(
        &self,
        source: &str,
        collection: &str,
        batch_size: usize,
    ) -> Result<IngestResult, IngestError> {
        let mut state = IngestState::Idle;
        debug!(state = %state, "Preparing bulk index");

        let handle = self.client.collection(collection)?;
        let reader = self.storage.open(source).await?;
        let batcher = Batcher::new(RecordDecoder::new(reader), batch_size);

        state = IngestState::Streaming;
        info!(state = %state, batch_size = batcher.batch_size(), "Streaming records");

        let max_in_flight = self.config.max_in_flight.max(1);
        let records_read = AtomicU64::new(0);

        let batches = stream::unfold(batcher, |mut batcher| async move {
            batcher.next_batch().await.map(|item| (item, batcher))
        });
        let mut submissions = pin!(batches
            .enumerate()
            .inspect(|(_, item)| {
                if let Ok(batch) = item {
                    records_read.fetch_add(batch.len() as u64, Ordering::Relaxed);
                }
            })
            .map(|(index, item)| {
                let handle = handle.clone();
                async move {
                    let batch = item?;
                    let outcome = handle.submit_batch(&batch).await;
                    Ok::<_, IngestError>(Submission {
                        batch_number: index as u64 + 1,
                        size: batch.len(),
                        outcome,
                    })
                }
            })
            .buffered(max_in_flight));

        let mut result = IngestResult::default();
        while let Some(submission) = submissions.next().await {
            result.records_read = records_read.load(Ordering::Relaxed);
            let submission = match submission {
                Ok(submission) => submission,
                Err(e) => return Err(self.abort(state, &result, e)),
            };

            match submission.outcome {
                Ok(outcome) => {
                    result.batches_submitted += 1;
                    result.records_failed += outcome.failed as u64;
                    if outcome.is_complete() {
                        debug!(
                            batch = submission.batch_number,
                            size = submission.size,
                            "Batch acknowledged"
                        );
                    } else {
                        warn!(
                            batch = submission.batch_number,
                            size = submission.size,
                            failed = outcome.failed,
                            "Batch acknowledged with rejected records"
                        );
                    }
                }
                Err(e) => {
                    error!(
                        collection = %handle.name(),
                        batch = submission.batch_number,
                        error = %e,
                        "Unexpected error while trying to bulk index documents"
                    );
                    let records_read = result.records_read;
                    return Err(self.abort(state, &result, IngestError::submit(records_read, e)));
                }
            }
        }
        result.records_read = records_read.load(Ordering::Relaxed);

        state = IngestState::Completed;
        self.metrics.counter(REQUESTS_COUNT, result.batches_submitted);
        self.metrics.counter(RECORDS, result.records_read);

        info!(
            state = %state,
            requests = result.batches_submitted,
            records = result.records_read,
            rejected = result.records_failed,
            "Successfully sent {} requests for {} records",
            result.batches_submitted,
            result.records_read
        );

        Ok(result)
    }

    /// Log the transition to `Failed` and hand back the error.
    ///
    /// In-flight submissions are cancelled when the submission stream is
    /// dropped by the caller's early return, and the source is released with it.
    fn abort(&self, from: IngestState, result: &IngestResult, err: IngestError) -> IngestError {
        error!(
            from = %from,
            state = %IngestState::Failed,
            records_read = result.records_read,
            batches_submitted = result.batches_submitted,
            error = %err,
            "Bulk index aborted"
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemoryMetricsSink;
    use crate::storage::LocalStorage;
    use crate::testing::InMemoryProvider;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn source(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn countries(count: usize) -> NamedTempFile {
        let lines: Vec<String> = (0..count)
            .map(|i| format!("{{\"id\":\"{}\",\"countryName\":\"Country {}\"}}", i, i))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        source(&refs)
    }

    struct Fixture {
        provider: Arc<InMemoryProvider>,
        metrics: Arc<InMemoryMetricsSink>,
        indexer: BulkIndexer,
    }

    fn fixture(provider: InMemoryProvider, max_in_flight: usize) -> Fixture {
        let provider = Arc::new(provider);
        let metrics = Arc::new(InMemoryMetricsSink::new());
        let indexer = BulkIndexer::with_config(
            Arc::new(LocalStorage::temporary()),
            SearchIndexClient::new(provider.clone()),
            metrics.clone(),
            BulkIndexConfig {
                batch_size: DEFAULT_BATCH_SIZE,
                max_in_flight,
            },
        );
        Fixture {
            provider,
            metrics,
            indexer,
        }
    }

    fn path(file: &NamedTempFile) -> String {
        file.path().to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_three_records_batch_of_two() {
        let file = countries(3);
        let f = fixture(InMemoryProvider::new(), 4);

        let result = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 2)
            .await
            .unwrap();

        assert_eq!(result.records_read, 3);
        assert_eq!(result.batches_submitted, 2);

        let mut sizes = f.provider.import_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 2]);

        assert_eq!(f.metrics.get(REQUESTS_COUNT), Some(2));
        assert_eq!(f.metrics.get(RECORDS), Some(3));
    }

    #[tokio::test]
    async fn test_empty_source_succeeds() {
        let file = source(&[]);
        let f = fixture(InMemoryProvider::new(), 4);

        let result = f.indexer.run(&path(&file), "Countries").await.unwrap();

        assert_eq!(result, IngestResult::default());
        assert!(f.provider.import_sizes().is_empty());
        assert_eq!(f.metrics.get(REQUESTS_COUNT), Some(0));
        assert_eq!(f.metrics.get(RECORDS), Some(0));
    }

    #[tokio::test]
    async fn test_counters_follow_batch_size() {
        let file = countries(25);
        for batch_size in [1, 4, 10, 25, 1000] {
            let f = fixture(InMemoryProvider::new(), 3);
            let result = f
                .indexer
                .run_with_batch_size(&path(&file), "Countries", batch_size)
                .await
                .unwrap();

            assert_eq!(result.records_read, 25, "batch_size={batch_size}");
            assert_eq!(
                result.batches_submitted,
                25u64.div_ceil(batch_size as u64),
                "batch_size={batch_size}"
            );
            assert_eq!(f.provider.documents("Countries").len(), 25);
        }
    }

    #[tokio::test]
    async fn test_submit_failure_stops_dispatch() {
        let file = countries(10);
        let f = fixture(InMemoryProvider::failing_on_import(2), 1);

        let err = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 2)
            .await
            .unwrap_err();

        match err {
            IngestError::SubmitError { records_read, source } => {
                assert_eq!(records_read, 4);
                assert!(matches!(source, SearchIndexError::SubmitError(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(f.provider.import_sizes(), vec![2, 2]);
        assert!(f.metrics.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_slow_failure_stops_dispatch_with_default_window() {
        let file = countries(200);
        let provider = Arc::new(InMemoryProvider::failing_slowly_on_import(
            1,
            Duration::from_millis(300),
        ));
        let metrics = Arc::new(InMemoryMetricsSink::new());
        let indexer = BulkIndexer::new(
            Arc::new(LocalStorage::temporary()),
            SearchIndexClient::new(provider.clone()),
            metrics.clone(),
        );
        let window = indexer.config().max_in_flight;
        assert_eq!(window, 4);

        let err = indexer
            .run_with_batch_size(&path(&file), "Countries", 2)
            .await
            .unwrap_err();

        match err {
            IngestError::SubmitError { records_read, .. } => {
                assert!(records_read <= 2 * window as u64, "records_read={records_read}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let imports = provider.import_sizes().len();
        assert!(imports <= window, "imports={imports}");
        assert!(provider.documents("Countries").len() <= 2 * (window - 1));
        assert!(metrics.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_aborts_run() {
        let file = source(&[
            "{\"id\":\"0\",\"countryName\":\"France\"}",
            "{\"id\":\"1\",\"countryName\":\"Germany\"}",
            "not json",
            "{\"id\":\"3\",\"countryName\":\"England\"}",
        ]);
        let f = fixture(InMemoryProvider::new(), 1);

        let err = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 2)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::DecodeError { line: 3, .. }));
        assert!(f.metrics.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_records_do_not_fail_the_run() {
        let file = source(&[
            "{\"id\":\"0\",\"countryName\":\"France\"}",
            "{\"countryName\":\"Nowhere\"}",
            "{\"id\":\"2\",\"countryName\":\"England\"}",
        ]);
        let f = fixture(InMemoryProvider::new(), 2);

        let result = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 2)
            .await
            .unwrap();

        assert_eq!(result.records_read, 3);
        assert_eq!(result.batches_submitted, 2);
        assert_eq!(result.records_failed, 1);
        assert_eq!(f.provider.documents("Countries").len(), 2);
    }

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        let file = countries(7);
        let f = fixture(InMemoryProvider::new(), 2);

        let first = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 3)
            .await
            .unwrap();
        let documents = f.provider.documents("Countries");

        let second = f
            .indexer
            .run_with_batch_size(&path(&file), "Countries", 3)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second.batches_submitted, 3);
        assert_eq!(f.provider.documents("Countries"), documents);
        assert_eq!(f.metrics.get(REQUESTS_COUNT), Some(6));
    }

    #[tokio::test]
    async fn test_missing_source_is_storage_error() {
        let f = fixture(InMemoryProvider::new(), 1);
        let err = f
            .indexer
            .run("/definitely/not/here.jsonl", "Countries")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_empty_collection_fails_before_io() {
        let f = fixture(InMemoryProvider::new(), 1);
        let err = f
            .indexer
            .run("/definitely/not/here.jsonl", "")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::SearchError(SearchIndexError::ValidationError(_))
        ));
    }
}
