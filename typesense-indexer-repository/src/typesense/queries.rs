//! Typesense request bodies and response parsing.
//!
//! The import endpoint speaks JSONL in both directions: one document per line
//! in the request, one `{"success": ...}` object per line in the response, in
//! the same order.

use serde::Deserialize;

use crate::errors::SearchIndexError;
use crate::types::{BatchOutcome, RecordOutcome};
use typesense_indexer_shared::{record_id, Record};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-typesense-api-key";

/// Import action that inserts new documents and replaces existing ones.
pub(crate) const UPSERT_ACTION: &str = "upsert";

/// One line of an import response.
#[derive(Debug, Deserialize)]
struct ImportLine {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Encode documents as a JSONL import body.
pub fn encode_import_body(documents: &[Record]) -> Result<String, SearchIndexError> {
    let mut body = String::new();
    for document in documents {
        let line = serde_json::to_string(document)
            .map_err(|e| SearchIndexError::submit(format!("Failed to encode document: {}", e)))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

/// Parse a JSONL import response into a batch outcome.
///
/// Lines are matched to `documents` by position to recover record ids for
/// diagnostics. A response with a different number of lines than documents
/// is treated as malformed.
pub fn parse_import_response(
    body: &str,
    documents: &[Record],
) -> Result<BatchOutcome, SearchIndexError> {
    let lines: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() != documents.len() {
        return Err(SearchIndexError::parse(format!(
            "Import response has {} lines for {} documents",
            lines.len(),
            documents.len()
        )));
    }

    let results = lines
        .into_iter()
        .zip(documents)
        .map(|(line, document)| {
            let parsed: ImportLine = serde_json::from_str(line).map_err(|e| {
                SearchIndexError::parse(format!("Invalid import response line: {}", e))
            })?;
            Ok(RecordOutcome {
                id: record_id(document),
                success: parsed.success,
                error: parsed.error,
            })
        })
        .collect::<Result<Vec<_>, SearchIndexError>>()?;

    Ok(BatchOutcome::from_results(results))
}
