//! Batcher module for the Typesense indexer ingest.
//!
//! Groups a record stream into ordered, non-overlapping batches.

use futures::{Stream, StreamExt};

use crate::errors::IngestError;
use typesense_indexer_shared::{Batch, Record};

/// Number of records per batch when none (or a non-positive one) is configured.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Resolve a configured batch size, falling back to [`DEFAULT_BATCH_SIZE`]
/// when it is missing or not positive.
pub fn resolve_batch_size(requested: Option<i64>) -> usize {
    match requested {
        Some(size) if size > 0 => usize::try_from(size).unwrap_or(DEFAULT_BATCH_SIZE),
        _ => DEFAULT_BATCH_SIZE,
    }
}

/// Pulls batches of at most `batch_size` records from a record stream.
///
/// Every batch holds exactly `batch_size` records except possibly the last.
/// A stream error is handed back unchanged and ends batching; records
/// buffered in the incomplete batch at that point are dropped.
pub struct Batcher<S> {
    records: S,
    batch_size: usize,
    finished: bool,
}

impl<S> Batcher<S>
where
    S: Stream<Item = Result<Record, IngestError>> + Unpin,
{
    /// Create a batcher. A `batch_size` of zero is treated as [`DEFAULT_BATCH_SIZE`].
    pub fn new(records: S, batch_size: usize) -> Self {
        let batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };

        Self {
            records,
            batch_size,
            finished: false,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pull the next batch.
    ///
    /// Returns `None` once the stream is exhausted or has failed.
    pub async fn next_batch(&mut self) -> Option<Result<Batch, IngestError>> {
        if self.finished {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.records.next().await {
                Some(Ok(record)) => batch.push(record),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
