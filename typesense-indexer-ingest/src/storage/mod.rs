//! Storage boundary for ingest sources and search results.
//!
//! The ingest only needs two primitives from a blob store: open a stored
//! object as a byte stream, and store a new object and return its location.

mod local;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::errors::IngestError;

pub use local::LocalStorage;

/// A readable byte stream over a stored object.
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// Blob store used to read ingest sources and write search results.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Open the object at `uri` for sequential reading.
    ///
    /// The returned reader owns the underlying handle; dropping it releases it.
    async fn open(&self, uri: &str) -> Result<ObjectReader, IngestError>;

    /// Store `bytes` as a new object and return its URI.
    async fn put(&self, bytes: Vec<u8>, extension: &str) -> Result<String, IngestError>;
}
