use std::fmt;
use std::sync::Arc;

use super::{EmbeddingProvider, EmbeddingRequest, EmbeddingVector, Result, TRACING_TARGET};
use crate::ServiceHealth;

/// Cheaply cloneable handle to an embedding provider.
///
/// The handle binds the provider to a single model identifier, which stays
/// fixed for the lifetime of the process.
#[derive(Clone)]
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    model: Arc<str>,
}

impl EmbeddingService {
    /// Wraps a provider together with the model it is queried with.
    pub fn new<P>(provider: P, model: impl Into<String>) -> Self
    where
        P: EmbeddingProvider + 'static,
    {
        Self::from_arc(Arc::new(provider), model)
    }

    /// Wraps an already shared provider.
    pub fn from_arc(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        let model: String = model.into();
        Self {
            provider,
            model: Arc::from(model),
        }
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embeds `text` with the bound model.
    pub async fn embed_text(&self, text: &str) -> Result<EmbeddingVector> {
        let request = EmbeddingRequest::new(self.model.as_ref(), text);
        tracing::trace!(
            target: TRACING_TARGET,
            model = %self.model,
            input_len = text.len(),
            "Requesting embedding"
        );

        self.provider.embed(&request).await
    }

    /// Forwards to the provider's health check.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}

impl fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
