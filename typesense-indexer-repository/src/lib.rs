//! # Typesense Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search index. It includes definitions for errors, interfaces, connection
//! configuration, and a concrete implementation for Typesense.

pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod types;
pub mod typesense;

pub use client::{CollectionHandle, SearchIndexClient};
pub use config::ConnectionConfig;
pub use errors::SearchIndexError;
pub use interfaces::IndexProvider;
pub use types::{BatchOutcome, RecordOutcome};
pub use typesense::TypesenseClient;
