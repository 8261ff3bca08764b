//! Interface definitions for the search index.
//!
//! This module defines the abstract `IndexProvider` trait that allows for
//! dependency injection and swappable backend implementations.

mod index_provider;

pub use index_provider::IndexProvider;
