//! # Typesense Indexer Ingest
//!
//! This crate provides the ingest components for streaming records from
//! storage into a Typesense collection, plus the one-shot document and
//! search tasks.
//!
//! ## Architecture
//!
//! The bulk ingest follows a Decoder-Batcher-Orchestrator pattern:
//!
//! 1. **Decoder**: Lazily decodes newline-delimited JSON records from storage
//! 2. **Batcher**: Groups records into fixed-size batches
//! 3. **Orchestrator**: Submits batches concurrently and aggregates counters
//! 4. **Metrics**: Receives the final counters of a successful run

pub mod batcher;
pub mod decoder;
pub mod errors;
pub mod metrics;
pub mod orchestrator;
pub mod storage;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use batcher::{resolve_batch_size, Batcher, DEFAULT_BATCH_SIZE};
pub use decoder::RecordDecoder;
pub use errors::IngestError;
pub use metrics::{InMemoryMetricsSink, MetricsSink, TracingMetricsSink};
pub use orchestrator::{BulkIndexConfig, BulkIndexer, IngestState};
pub use storage::{LocalStorage, Storage};
pub use tasks::{DocumentGet, DocumentIndex, MissingDocumentPolicy, SearchTask};
