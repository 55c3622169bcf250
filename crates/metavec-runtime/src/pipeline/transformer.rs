//! The per-item read, parse, embed, write pipeline.

use std::time::{Duration, Instant};

use metavec_core::emb::{EmbeddingService, EmbeddingVector};
use metavec_opendal::Namespace;

use super::TRACING_TARGET;
use super::outcome::ItemOutcome;
use super::record::{EmbeddingRecord, MetadataRecord};
use crate::error::ItemError;

/// Transforms one metadata object into one stored embedding record.
///
/// Cloning is cheap; every clone shares the same storage operator and
/// embedding client.
#[derive(Debug, Clone)]
pub struct ItemTransformer {
    source: Namespace,
    target: Namespace,
    embeddings: EmbeddingService,
    embedding_timeout: Duration,
}

impl ItemTransformer {
    pub fn new(
        source: Namespace,
        target: Namespace,
        embeddings: EmbeddingService,
        embedding_timeout: Duration,
    ) -> Self {
        Self {
            source,
            target,
            embeddings,
            embedding_timeout,
        }
    }

    /// Runs every stage for `identifier`. Never fails: stage errors are
    /// captured into the returned outcome.
    pub async fn transform(&self, identifier: String) -> ItemOutcome {
        let started = Instant::now();

        match self.try_transform(&identifier).await {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    blob = %identifier,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Item transformed"
                );
                ItemOutcome::success(identifier)
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    blob = %identifier,
                    kind = %error.kind(),
                    error = %error.message(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "Item transformation failed"
                );
                ItemOutcome::failure(identifier, error)
            }
        }
    }

    async fn try_transform(&self, identifier: &str) -> Result<(), ItemError> {
        let raw = self.source.read(identifier).await.map_err(ItemError::read)?;
        let record = MetadataRecord::parse(&raw)?;

        let embeddings = self.embed(&record.embedding_text()).await?;
        let output = EmbeddingRecord {
            file_name: identifier.to_owned(),
            embeddings,
            file_path: record.file_path(),
        };

        let payload = output.to_json().map_err(ItemError::write)?;
        self.target
            .write(identifier, payload)
            .await
            .map_err(ItemError::write)
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, ItemError> {
        let vector = tokio::time::timeout(self.embedding_timeout, self.embeddings.embed_text(text))
            .await
            .map_err(|_| {
                ItemError::embedding(format!(
                    "embedding request timed out after {}s",
                    self.embedding_timeout.as_secs_f64()
                ))
            })?
            .map_err(ItemError::embedding)?;

        if vector.dimensions() == 0 {
            return Err(ItemError::embedding("provider returned an empty vector"));
        }

        if vector.iter().any(|component| !component.is_finite()) {
            return Err(ItemError::embedding(
                "provider returned a vector with non-finite components",
            ));
        }

        Ok(vector)
    }
}
