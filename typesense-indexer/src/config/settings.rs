//! Command line and environment settings.
//!
//! Every connection option can come from a flag or from its `TYPESENSE_*`
//! environment variable (a `.env` file is loaded first). Raw values are
//! checked by [`Settings::from_cli`] before any client is built.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::IndexingError;
use typesense_indexer_ingest::{resolve_batch_size, BulkIndexConfig, MissingDocumentPolicy};
use typesense_indexer_repository::ConnectionConfig;
use typesense_indexer_shared::{Record, SearchRequest};

#[derive(Debug, Parser)]
#[command(name = "typesense-indexer")]
#[command(about = "Bulk index and query a Typesense collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Typesense host
    #[arg(long, env = "TYPESENSE_HOST", global = true)]
    pub host: Option<String>,

    /// Typesense port
    #[arg(long, env = "TYPESENSE_PORT", global = true)]
    pub port: Option<String>,

    /// Typesense API key
    #[arg(long, env = "TYPESENSE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Target collection
    #[arg(long, env = "TYPESENSE_COLLECTION", global = true)]
    pub collection: Option<String>,

    /// Connect over https
    #[arg(long, env = "TYPESENSE_USE_HTTPS", global = true)]
    pub use_https: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TYPESENSE_TIMEOUT_SECS", default_value_t = 2, global = true)]
    pub timeout_secs: u64,

    /// Directory receiving search results (defaults to the system temp dir)
    #[arg(long, env = "TYPESENSE_STORAGE_DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// What a get does when the document is absent (fail|warn)
    #[arg(long, env = "TYPESENSE_MISSING_DOCUMENT", default_value = "fail", global = true)]
    pub missing_document: MissingDocumentPolicy,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream a newline-delimited JSON source into the collection
    BulkIndex {
        /// Source URI (file:///path or a plain path)
        #[arg(long)]
        from: String,

        /// Records per batch; missing or non-positive means 1000
        #[arg(long, env = "TYPESENSE_BATCH_SIZE", allow_negative_numbers = true)]
        batch_size: Option<i64>,

        /// Batches submitted concurrently
        #[arg(long, env = "TYPESENSE_MAX_IN_FLIGHT", default_value_t = 4)]
        max_in_flight: usize,
    },
    /// Fetch one document by id
    Get {
        #[arg(long)]
        id: String,
    },
    /// Upsert one document given as a JSON object
    Index {
        #[arg(long)]
        document: String,
    },
    /// Run a search and store the result
    Search {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Run a search with facet counts and store the result
    FacetSearch {
        #[command(flatten)]
        query: QueryArgs,

        /// Fields to compute facet counts over
        #[arg(long)]
        facet_by: String,
    },
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Query text
    #[arg(long, short)]
    pub q: String,

    /// Comma-separated fields to search
    #[arg(long)]
    pub query_by: String,

    /// Filter expression, passed through verbatim
    #[arg(long)]
    pub filter_by: Option<String>,

    /// Sort expression, passed through verbatim
    #[arg(long)]
    pub sort_by: Option<String>,
}

impl QueryArgs {
    fn into_request(self) -> Result<SearchRequest, IndexingError> {
        if self.query_by.trim().is_empty() {
            return Err(IndexingError::config("query_by is required"));
        }
        let mut request = SearchRequest::new(self.q, self.query_by);
        request.filter_by = self.filter_by;
        request.sort_by = self.sort_by;
        Ok(request)
    }
}

/// The task selected on the command line, with validated arguments.
#[derive(Debug, Clone)]
pub enum Task {
    BulkIndex {
        source: String,
        config: BulkIndexConfig,
    },
    Get {
        id: String,
    },
    Index {
        document: Record,
    },
    Search {
        request: SearchRequest,
    },
    FacetSearch {
        request: SearchRequest,
        facet_by: String,
    },
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub collection: String,
    pub storage_dir: Option<PathBuf>,
    pub missing_document: MissingDocumentPolicy,
    pub task: Task,
}

impl Settings {
    /// Validate parsed arguments.
    ///
    /// Every missing or malformed value is a [`IndexingError::ConfigError`].
    pub fn from_cli(cli: Cli) -> Result<Self, IndexingError> {
        let host = required("host", cli.host)?;
        let port = required("port", cli.port)?;
        let api_key = required("api_key", cli.api_key)?;
        let collection = required("collection", cli.collection)?;

        if cli.timeout_secs == 0 {
            return Err(IndexingError::config("timeout_secs must be positive"));
        }

        let connection = ConnectionConfig::new(host, port, api_key)
            .with_https(cli.use_https)
            .with_timeout(Duration::from_secs(cli.timeout_secs));
        connection
            .validate()
            .map_err(|e| IndexingError::config(e.to_string()))?;

        let task = match cli.command {
            Command::BulkIndex {
                from,
                batch_size,
                max_in_flight,
            } => {
                if from.trim().is_empty() {
                    return Err(IndexingError::config("from is required"));
                }
                if max_in_flight == 0 {
                    return Err(IndexingError::config("max_in_flight must be positive"));
                }
                Task::BulkIndex {
                    source: from,
                    config: BulkIndexConfig {
                        batch_size: resolve_batch_size(batch_size),
                        max_in_flight,
                    },
                }
            }
            Command::Get { id } => Task::Get {
                id: required("id", Some(id))?,
            },
            Command::Index { document } => Task::Index {
                document: parse_document(&document)?,
            },
            Command::Search { query } => Task::Search {
                request: query.into_request()?,
            },
            Command::FacetSearch { query, facet_by } => Task::FacetSearch {
                request: query.into_request()?,
                facet_by: required("facet_by", Some(facet_by))?,
            },
        };

        Ok(Self {
            connection,
            collection,
            storage_dir: cli.storage_dir,
            missing_document: cli.missing_document,
            task,
        })
    }
}

fn required(name: &str, value: Option<String>) -> Result<String, IndexingError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(IndexingError::config(format!("{} is required", name))),
    }
}

fn parse_document(raw: &str) -> Result<Record, IndexingError> {
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Object(document)) => Ok(document),
        Ok(_) => Err(IndexingError::config("document must be a JSON object")),
        Err(e) => Err(IndexingError::config(format!("document is not valid JSON: {}", e))),
    }
}
