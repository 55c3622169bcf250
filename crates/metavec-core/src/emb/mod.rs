//! Embedding service abstractions.
//!
//! An [`EmbeddingProvider`] turns one piece of text into one
//! [`EmbeddingVector`]. Providers are wrapped into an [`EmbeddingService`],
//! which binds them to the model identifier used for the whole process.

mod request;
mod service;
mod vector;

pub use request::EmbeddingRequest;
pub use service::EmbeddingService;
pub use vector::EmbeddingVector;

use crate::ServiceHealth;
pub use crate::{Error, ErrorKind, Result};

/// Tracing target for embedding operations.
pub const TRACING_TARGET: &str = "metavec_core::emb";

/// Core trait for embedding providers.
///
/// Implementations must be safe to call from many tasks at once: the
/// conversion pipeline shares a single provider across its workers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Computes the embedding vector for the request's input text.
    ///
    /// Authentication failures, rate limiting, transport errors and
    /// malformed upstream payloads are all reported through [`Error`], with
    /// the upstream message kept in [`Error::message`].
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingVector>;

    /// Performs a health check on the provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
