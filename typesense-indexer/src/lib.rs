//! # Typesense Indexer
//!
//! Main library for the Typesense bulk indexer.
//!
//! This crate provides the command line configuration, the dependency wiring
//! and the dispatch of each task to the ingest crate.

pub mod commands;
pub mod config;

pub use commands::execute;
pub use config::{Cli, Dependencies, Settings, Task};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error, raised before any I/O.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest or task error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] typesense_indexer_ingest::IngestError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] typesense_indexer_repository::SearchIndexError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The run was interrupted by a signal.
    #[error("Interrupted")]
    Interrupted,
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
