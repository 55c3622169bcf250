//! Embedding processing response types.

use metavec_runtime::{BatchResult, ItemOutcome};
use serde::{Deserialize, Serialize};

/// Message returned once a batch ran to completion.
pub const BATCH_COMPLETED_MESSAGE: &str = "Processing completed";

/// Message returned when a single object was converted.
pub const SINGLE_SUCCESS_MESSAGE: &str = "Embeddings generated and stored successfully";

/// Response of the batch processing endpoint.
#[must_use]
#[derive(Debug, Clone, Serialize)]
pub struct ProcessEmbeddingsResponse {
    /// Always [`BATCH_COMPLETED_MESSAGE`].
    pub message: &'static str,
    /// Processed and failed identifiers.
    pub result: BatchResult,
}

impl From<BatchResult> for ProcessEmbeddingsResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            message: BATCH_COMPLETED_MESSAGE,
            result,
        }
    }
}

/// Outcome reported by the single-object endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Success,
    Error,
}

/// Response of the single-object processing endpoint.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSingleResponse {
    pub status: ProcessingStatus,
    /// Normalized identifier, always prefixed with `{user_id}/`.
    pub blob_name: String,
    pub message: String,
}

impl From<ItemOutcome> for ProcessSingleResponse {
    fn from(outcome: ItemOutcome) -> Self {
        match outcome {
            ItemOutcome::Success { identifier } => Self {
                status: ProcessingStatus::Success,
                blob_name: identifier,
                message: SINGLE_SUCCESS_MESSAGE.to_owned(),
            },
            ItemOutcome::Failure { identifier, error } => Self {
                status: ProcessingStatus::Error,
                blob_name: identifier,
                message: error.to_string(),
            },
        }
    }
}
