//! Per-item outcomes and their aggregation into a batch report.

use serde::Serialize;

use crate::error::ItemError;

/// Result of transforming one item. Produced exactly once per job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The embedding record was written.
    Success { identifier: String },
    /// A stage failed; nothing was written for this item.
    Failure { identifier: String, error: ItemError },
}

impl ItemOutcome {
    /// Creates a success outcome.
    pub fn success(identifier: impl Into<String>) -> Self {
        Self::Success {
            identifier: identifier.into(),
        }
    }

    /// Creates a failure outcome.
    pub fn failure(identifier: impl Into<String>, error: ItemError) -> Self {
        Self::Failure {
            identifier: identifier.into(),
            error,
        }
    }

    /// Returns the item's identifier.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Success { identifier } | Self::Failure { identifier, .. } => identifier,
        }
    }

    /// Returns the error of a failed item.
    pub fn error(&self) -> Option<&ItemError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Returns `true` for [`ItemOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A failed item as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    /// Identifier of the source object.
    pub blob: String,
    /// What went wrong, rendered as `"{kind} error: {message}"`.
    pub error: ItemError,
}

/// Partition of a batch's outcomes.
///
/// Every scheduled identifier appears in exactly one of the two lists, and
/// both lists are sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Identifiers whose embedding record was written.
    #[serde(rename = "processed_files")]
    pub processed: Vec<String>,
    /// Identifiers that failed, with their error.
    #[serde(rename = "failed_files")]
    pub failed: Vec<FailedItem>,
}

impl BatchResult {
    /// Total number of outcomes in the report.
    pub fn len(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Returns `true` if the batch had no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Success { identifier } => self.processed.push(identifier),
            ItemOutcome::Failure { identifier, error } => self.failed.push(FailedItem {
                blob: identifier,
                error,
            }),
        }
    }

    fn sort(&mut self) {
        self.processed.sort_unstable();
        self.failed.sort_unstable_by(|a, b| a.blob.cmp(&b.blob));
    }
}

impl Extend<ItemOutcome> for BatchResult {
    fn extend<I: IntoIterator<Item = ItemOutcome>>(&mut self, outcomes: I) {
        outcomes.into_iter().for_each(|outcome| self.push(outcome));
        self.sort();
    }
}

impl FromIterator<ItemOutcome> for BatchResult {
    fn from_iter<I: IntoIterator<Item = ItemOutcome>>(outcomes: I) -> Self {
        let mut result = Self::default();
        result.extend(outcomes);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemErrorKind;

    fn outcomes() -> Vec<ItemOutcome> {
        vec![
            ItemOutcome::success("u1/c.json"),
            ItemOutcome::failure("u1/b.json", ItemError::parse("trailing comma")),
            ItemOutcome::success("u1/a.json"),
        ]
    }

    #[test]
    fn partition_is_independent_of_arrival_order() {
        let forward: BatchResult = outcomes().into_iter().collect();
        let backward: BatchResult = outcomes().into_iter().rev().collect();

        assert_eq!(forward, backward);
        assert_eq!(forward.processed, vec!["u1/a.json", "u1/c.json"]);
        assert_eq!(forward.failed.len(), 1);
        assert_eq!(forward.failed[0].error.kind(), ItemErrorKind::Parse);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn serializes_with_wire_names() {
        let result: BatchResult = outcomes().into_iter().collect();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({
                "processed_files": ["u1/a.json", "u1/c.json"],
                "failed_files": [{ "blob": "u1/b.json", "error": "parse error: trailing comma" }],
            })
        );
    }

    #[test]
    fn empty_batch() {
        let result: BatchResult = Vec::<ItemOutcome>::new().into_iter().collect();
        assert!(result.is_empty());
    }
}
