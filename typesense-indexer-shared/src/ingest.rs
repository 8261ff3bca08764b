//! Bulk ingest result type.

use serde::{Deserialize, Serialize};

/// Aggregate counters of one bulk ingest run.
///
/// `records_read` counts what was decoded from the source, not what was
/// committed: it always equals the sum of the sizes of every batch formed.
/// `batches_submitted` only counts batches the index acknowledged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    /// Number of records decoded from the source.
    pub records_read: u64,
    /// Number of batches acknowledged by the index.
    pub batches_submitted: u64,
    /// Records rejected individually inside acknowledged batches.
    #[serde(default)]
    pub records_failed: u64,
}

impl IngestResult {
    /// Records accepted by the index across all acknowledged batches.
    pub fn records_accepted(&self) -> u64 {
        self.records_read.saturating_sub(self.records_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let result = IngestResult::default();
        assert_eq!(result.records_read, 0);
        assert_eq!(result.batches_submitted, 0);
        assert_eq!(result.records_failed, 0);
    }

    #[test]
    fn test_serialized_shape() {
        let result = IngestResult {
            records_read: 3,
            batches_submitted: 2,
            records_failed: 1,
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["records_read"], 3);
        assert_eq!(value["batches_submitted"], 2);
        assert_eq!(result.records_accepted(), 2);
    }
}
