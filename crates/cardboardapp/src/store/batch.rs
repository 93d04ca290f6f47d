use crate::error::{CardboardError, Result};

/// A single write that did not go through.
#[derive(Debug)]
pub struct BatchFailure {
    pub id: String,
    pub error: CardboardError,
}

/// Outcome of a scatter/gather batch of independent per-document writes.
///
/// A batch never stops at the first failure and never rolls back the writes
/// that succeeded. Callers mirror only `succeeded` into their in-memory state.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Issues `write` once per id and gathers every outcome.
    pub fn gather<I, F>(ids: I, mut write: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: FnMut(&str) -> Result<()>,
    {
        let mut report = BatchReport::default();
        for id in ids {
            match write(&id) {
                Ok(()) => report.succeeded.push(id),
                Err(error) => {
                    tracing::warn!(%id, %error, "batch write failed");
                    report.failed.push(BatchFailure { id, error });
                }
            }
        }
        report
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn has_succeeded(&self, id: &str) -> bool {
        self.succeeded.iter().any(|s| s == id)
    }

}
