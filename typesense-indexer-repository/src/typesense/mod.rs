//! Typesense implementation of the index provider.
//!
//! This module provides a concrete implementation of `IndexProvider`
//! using the Typesense REST API.

mod client;
mod queries;

pub use client::TypesenseClient;
pub use queries::{encode_import_body, parse_import_response, API_KEY_HEADER};
