//! Pipeline error types.

use std::fmt;

use metavec_opendal::StorageError;
use serde::{Serialize, Serializer};
use strum::{AsRefStr, Display, IntoStaticStr};
use thiserror::Error;

/// Result type for request-level pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures that abort a whole request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The output namespace could not be checked or created.
    #[error("failed to provision namespace '{namespace}': {source}")]
    Provisioning {
        /// Namespace that could not be provisioned.
        namespace: String,
        /// Underlying storage failure.
        #[source]
        source: StorageError,
    },

    /// The user's source objects could not be listed.
    #[error("failed to list objects for user '{user_id}': {source}")]
    Enumeration {
        /// User whose objects were being listed.
        user_id: String,
        /// Underlying storage failure.
        #[source]
        source: StorageError,
    },
}

/// Stage of the item transformation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ItemErrorKind {
    /// The source object could not be read.
    Read,
    /// The source object is not a JSON object.
    Parse,
    /// The embedding provider failed, timed out or answered garbage.
    EmbeddingService,
    /// The output record could not be serialized or written.
    Write,
    /// The job's task ended without producing an outcome.
    Worker,
}

/// A per-item failure, captured into the batch report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ItemError {
    kind: ItemErrorKind,
    message: String,
}

impl ItemError {
    /// Creates a new item error.
    pub fn new(kind: ItemErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a read error.
    pub fn read(cause: impl fmt::Display) -> Self {
        Self::new(ItemErrorKind::Read, cause.to_string())
    }

    /// Creates a parse error.
    pub fn parse(cause: impl fmt::Display) -> Self {
        Self::new(ItemErrorKind::Parse, cause.to_string())
    }

    /// Creates an embedding service error.
    pub fn embedding(cause: impl fmt::Display) -> Self {
        Self::new(ItemErrorKind::EmbeddingService, cause.to_string())
    }

    /// Creates a write error.
    pub fn write(cause: impl fmt::Display) -> Self {
        Self::new(ItemErrorKind::Write, cause.to_string())
    }

    /// Creates a worker error.
    pub fn worker(cause: impl fmt::Display) -> Self {
        Self::new(ItemErrorKind::Worker, cause.to_string())
    }

    /// Returns the failed stage.
    pub fn kind(&self) -> ItemErrorKind {
        self.kind
    }

    /// Returns the underlying message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Serialize for ItemError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
