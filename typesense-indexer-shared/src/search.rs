//! Search request and response types.
//!
//! Filter, sort and facet expressions are opaque strings handed to Typesense
//! verbatim; nothing here parses or validates them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters of a search against one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query (`q`).
    pub query: String,
    /// Comma-separated fields to search (`query_by`). Order matters for tie-breaking.
    pub query_by: String,
    /// Optional `filter_by` clause.
    pub filter_by: Option<String>,
    /// Optional `sort_by` clause, e.g. `gdp:desc`.
    pub sort_by: Option<String>,
    /// Optional `facet_by` fields.
    pub facet_by: Option<String>,
}

impl SearchRequest {
    /// Create a plain full-text search request.
    pub fn new(query: impl Into<String>, query_by: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            query_by: query_by.into(),
            filter_by: None,
            sort_by: None,
            facet_by: None,
        }
    }

    /// Set the filter expression.
    pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
        self.filter_by = Some(filter_by.into());
        self
    }

    /// Set the sort expression.
    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Turn this request into a facet search over the given fields.
    pub fn with_facet_by(mut self, facet_by: impl Into<String>) -> Self {
        self.facet_by = Some(facet_by.into());
        self
    }

    /// Whether facet counts were requested.
    pub fn is_facet_search(&self) -> bool {
        self.facet_by.as_deref().is_some_and(|f| !f.trim().is_empty())
    }

    /// Render the request as Typesense query parameters.
    ///
    /// Optional clauses that are absent or blank are omitted.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.query.clone()),
            ("query_by", self.query_by.clone()),
        ];

        let optional = [
            ("filter_by", &self.filter_by),
            ("sort_by", &self.sort_by),
            ("facet_by", &self.facet_by),
        ];
        for (name, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                params.push((name, value.to_string()));
            }
        }

        params
    }
}

/// Count of one distinct value of a faceted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetValueCount {
    pub count: u64,
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Facet breakdown for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCount {
    pub field_name: String,
    #[serde(default)]
    pub counts: Vec<FacetValueCount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full structured search response.
///
/// Only the fields the indexer reads are typed; everything else Typesense
/// returns (`out_of`, `page`, `search_time_ms`, ...) is kept in `extra` so the
/// result written to storage is the complete response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Number of matching documents.
    pub found: u64,
    #[serde(default)]
    pub hits: Vec<Value>,
    #[serde(default)]
    pub facet_counts: Vec<FacetCount>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    /// An empty result with no hits.
    pub fn empty() -> Self {
        Self {
            found: 0,
            hits: Vec::new(),
            facet_counts: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// Output of a search task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutput {
    /// Location of the stored result record.
    pub result_uri: String,
    /// Number of documents matched.
    pub total_hits: u64,
}
