//! Connection configuration for the Typesense client.

use std::time::Duration;

use crate::errors::SearchIndexError;

/// Default request timeout, matching the Typesense client's connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Where and how to reach a Typesense node.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Host name or address of the node.
    pub host: String,
    /// Port of the node, kept as a string the way it is configured.
    pub port: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Use `https` instead of `http`.
    pub use_https: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Create a plain-HTTP configuration with the default timeout.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            api_key: api_key.into(),
            use_https: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Enable or disable https.
    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Scheme derived from `use_https`.
    pub fn scheme(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }

    /// Render the node base URL, e.g. `http://localhost:8108`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> Result<(), SearchIndexError> {
        if self.host.trim().is_empty() {
            return Err(SearchIndexError::validation("host is required"));
        }
        if self.port.trim().is_empty() {
            return Err(SearchIndexError::validation("port is required"));
        }
        if self.port.trim().parse::<u16>().is_err() {
            return Err(SearchIndexError::validation(format!(
                "port must be a valid TCP port, got {:?}",
                self.port
            )));
        }
        if self.api_key.is_empty() {
            return Err(SearchIndexError::validation("api_key is required"));
        }
        Ok(())
    }
}
