//! Typesense client implementation.
//!
//! This module provides the concrete implementation of `IndexProvider`
//! on top of the Typesense REST API using `reqwest`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::IndexProvider;
use crate::types::BatchOutcome;
use crate::typesense::queries::{
    encode_import_body, parse_import_response, API_KEY_HEADER, UPSERT_ACTION,
};
use typesense_indexer_shared::{Record, SearchRequest, SearchResult};

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
}

/// Typesense client implementation.
///
/// Holds one pooled HTTP client; cloning a `reqwest::Client` shares the
/// connection pool, so a single `TypesenseClient` can serve any number of
/// concurrent requests.
///
/// # Example
///
/// ```ignore
/// use typesense_indexer_repository::{ConnectionConfig, TypesenseClient};
///
/// let config = ConnectionConfig::new("localhost", "8108", "my_key");
/// let client = TypesenseClient::new(&config)?;
/// let outcome = client.import_documents("Countries", &records).await?;
/// ```
#[derive(Clone)]
pub struct TypesenseClient {
    http: Client,
    base_url: Url,
}

impl TypesenseClient {
    /// Create a new Typesense client for the configured node.
    ///
    /// # Returns
    ///
    /// * `Ok(TypesenseClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the configuration is invalid or the HTTP client cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url())
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| SearchIndexError::validation(format!("Invalid api_key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            "Created Typesense client"
        );

        Ok(Self { http, base_url })
    }

    /// Build an endpoint URL from escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SearchIndexError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SearchIndexError::connection("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn error_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }
}

#[async_trait]
impl IndexProvider for TypesenseClient {
    /// Import a batch with `action=upsert`.
    ///
    /// Typesense answers 200 even when some records are rejected; those are
    /// reported in the returned outcome. Transport errors, timeouts and non-2xx
    /// statuses fail the whole batch.
    #[instrument(skip(self, documents), fields(collection = %collection, count = documents.len()))]
    async fn import_documents(
        &self,
        collection: &str,
        documents: &[Record],
    ) -> Result<BatchOutcome, SearchIndexError> {
        let url = self.endpoint(&["collections", collection, "documents", "import"])?;
        let body = encode_import_body(documents)?;

        let response = self
            .http
            .post(url)
            .query(&[("action", UPSERT_ACTION)])
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::submit(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Import request failed");
            return Err(SearchIndexError::submit(format!(
                "Import failed with status {}: {}",
                status, error_body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| SearchIndexError::submit(e.to_string()))?;
        let outcome = parse_import_response(&text, documents)?;

        if !outcome.is_complete() {
            for failure in outcome.failures() {
                warn!(
                    id = failure.id.as_deref().unwrap_or("<none>"),
                    error = failure.error.as_deref().unwrap_or("unknown"),
                    "Record rejected by Typesense"
                );
            }
        }

        debug!(
            succeeded = outcome.succeeded,
            failed = outcome.failed,
            "Batch imported"
        );
        Ok(outcome)
    }

    #[instrument(skip(self, document), fields(collection = %collection))]
    async fn upsert_document(
        &self,
        collection: &str,
        document: &Record,
    ) -> Result<Record, SearchIndexError> {
        let url = self.endpoint(&["collections", collection, "documents"])?;

        let response = self
            .http
            .post(url)
            .query(&[("action", UPSERT_ACTION)])
            .json(document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Upsert request failed");
            return Err(SearchIndexError::index(format!(
                "Upsert failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<Record>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Record, SearchIndexError> {
        let url = self.endpoint(&["collections", collection, "documents", document_id])?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SearchIndexError::document_not_found(collection, document_id));
        }
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Get request failed");
            return Err(SearchIndexError::query(format!(
                "Get failed with status {}: {}",
                status, error_body
            )));
        }

        response
            .json::<Record>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }

    #[instrument(skip(self, request), fields(collection = %collection, q = %request.query))]
    async fn search(
        &self,
        collection: &str,
        request: &SearchRequest,
    ) -> Result<SearchResult, SearchIndexError> {
        let url = self.endpoint(&["collections", collection, "documents", "search"])?;

        let response = self
            .http
            .get(url)
            .query(&request.to_query_params())
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(SearchIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let result = response
            .json::<SearchResult>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        debug!(found = result.found, hits = result.hits.len(), "Search completed");
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let url = self.endpoint(&["health"])?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(false);
        }

        let health = response
            .json::<HealthResponse>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        Ok(health.ok)
    }
}
