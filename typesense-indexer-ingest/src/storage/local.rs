//! Local file system storage.
//!
//! Sources are addressed either as `file://` URIs or as plain paths. New
//! objects are written under a configured output directory with a unique,
//! timestamped name and returned as `file://` URIs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::errors::IngestError;
use crate::storage::{ObjectReader, Storage};

const FILE_SCHEME: &str = "file://";

/// Storage backed by the local file system.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_dir: PathBuf,
}

impl LocalStorage {
    /// Create a storage writing new objects under `output_dir`.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Create a storage writing new objects to the system temp directory.
    pub fn temporary() -> Self {
        Self::new(std::env::temp_dir())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve a URI to a local path.
    fn resolve(uri: &str) -> Result<PathBuf, IngestError> {
        if let Some(path) = uri.strip_prefix(FILE_SCHEME) {
            return Ok(PathBuf::from(path));
        }
        if let Some((scheme, _)) = uri.split_once("://") {
            return Err(IngestError::storage(format!(
                "Unsupported storage scheme '{}' in {}",
                scheme, uri
            )));
        }
        Ok(PathBuf::from(uri))
    }

    fn object_name(extension: &str) -> String {
        format!(
            "{}-{}.{}",
            Utc::now().format("%Y%m%dT%H%M%S"),
            Uuid::new_v4(),
            extension.trim_start_matches('.')
        )
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn open(&self, uri: &str) -> Result<ObjectReader, IngestError> {
        let path = Self::resolve(uri)?;
        let file = File::open(&path)
            .await
            .map_err(|e| IngestError::storage(format!("Failed to open {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Opened source");
        Ok(Box::new(file))
    }

    async fn put(&self, bytes: Vec<u8>, extension: &str) -> Result<String, IngestError> {
        fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(Self::object_name(extension));
        let mut file = File::create(&path).await.map_err(|e| {
            IngestError::storage(format!("Failed to create {}: {}", path.display(), e))
        })?;
        file.write_all(&bytes).await?;
        file.flush().await?;

        debug!(path = %path.display(), bytes = bytes.len(), "Stored object");
        Ok(format!("{}{}", FILE_SCHEME, path.display()))
    }
}
