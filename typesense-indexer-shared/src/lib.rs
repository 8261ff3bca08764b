//! # Typesense Indexer Shared
//!
//! Shared types and data structures used by every crate of the Typesense
//! indexer: the dynamically typed [`Record`], the ingest counters, and the
//! search request/response model.

mod ingest;
mod record;
mod search;

pub use ingest::IngestResult;
pub use record::{record_id, Batch, Record, ID_FIELD};
pub use search::{FacetCount, FacetValueCount, SearchOutput, SearchRequest, SearchResult};
