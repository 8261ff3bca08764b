//! Request and response types for search index operations.

/// Result of one record inside an imported batch.
///
/// Typesense applies the records of a batch independently and reports one
/// line per record, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The record's `id`, when it had one.
    pub id: Option<String>,
    /// Whether the record was upserted.
    pub success: bool,
    /// Backend diagnostic if the record was rejected.
    pub error: Option<String>,
}

/// Acknowledgment of a batch import containing aggregate statistics and
/// individual results.
///
/// A batch that produced a `BatchOutcome` reached the index and was answered;
/// individual records may still have been rejected, which callers can inspect
/// through `failed` and `results`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Total number of records in the batch.
    pub total: usize,
    /// Number of records upserted.
    pub succeeded: usize,
    /// Number of records rejected.
    pub failed: usize,
    /// Individual results for each record.
    pub results: Vec<RecordOutcome>,
}

impl BatchOutcome {
    /// Build an outcome from individual record results.
    pub fn from_results(results: Vec<RecordOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Whether every record of the batch was upserted.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    /// Iterate over the rejected records.
    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.results.iter().filter(|r| !r.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: &str, success: bool) -> RecordOutcome {
        RecordOutcome {
            id: Some(id.to_string()),
            success,
            error: (!success).then(|| "Bad JSON.".to_string()),
        }
    }

    #[test]
    fn test_from_results_counts() {
        let summary = BatchOutcome::from_results(vec![
            outcome("a", true),
            outcome("b", false),
            outcome("c", true),
        ]);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_complete());
        assert_eq!(summary.failures().next().unwrap().id.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_outcome_is_complete() {
        assert!(BatchOutcome::from_results(vec![]).is_complete());
    }
}
