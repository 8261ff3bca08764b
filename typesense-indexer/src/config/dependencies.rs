//! Dependency initialization and wiring for the Typesense indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use typesense_indexer_ingest::{LocalStorage, MetricsSink, Storage, TracingMetricsSink};
use typesense_indexer_repository::{SearchIndexClient, TypesenseClient};

/// Container for all initialized dependencies.
#[derive(Clone)]
pub struct Dependencies {
    /// Client bound to the configured Typesense node.
    pub client: SearchIndexClient,
    /// Storage used to read sources and write search results.
    pub storage: Arc<dyn Storage>,
    /// Sink receiving run counters.
    pub metrics: Arc<dyn MetricsSink>,
}

impl Dependencies {
    /// Initialize all dependencies from validated settings.
    ///
    /// No request is sent; see [`Dependencies::verify_connection`].
    pub fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            url = %settings.connection.base_url(),
            collection = %settings.collection,
            "Initializing dependencies"
        );

        let typesense = TypesenseClient::new(&settings.connection)
            .map_err(|e| IndexingError::config(format!("Failed to create Typesense client: {}", e)))?;

        let storage = match &settings.storage_dir {
            Some(dir) => LocalStorage::new(dir),
            None => LocalStorage::temporary(),
        };
        info!(output_dir = %storage.output_dir().display(), "Local storage ready");

        Ok(Self::from_parts(
            SearchIndexClient::new(Arc::new(typesense)),
            Arc::new(storage),
            Arc::new(TracingMetricsSink),
        ))
    }

    /// Assemble dependencies from already built parts.
    pub fn from_parts(
        client: SearchIndexClient,
        storage: Arc<dyn Storage>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            client,
            storage,
            metrics,
        }
    }

    /// Check that the Typesense node answers and reports itself healthy.
    pub async fn verify_connection(&self) -> Result<(), IndexingError> {
        let healthy = self
            .client
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("Typesense health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("Typesense node is unhealthy"));
        }

        info!("Typesense connection verified");
        Ok(())
    }
}
