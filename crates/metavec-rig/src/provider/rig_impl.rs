//! Embedding providers backed by rig-core.

use std::fmt;

use metavec_core::emb::{EmbeddingProvider, EmbeddingRequest, EmbeddingVector};
use metavec_core::{Result as CoreResult, ServiceHealth};
use rig::embeddings::EmbeddingModel as RigEmbeddingModel;
use rig::prelude::EmbeddingsClient;
use rig::providers::{cohere, gemini, openai};

use super::EmbeddingProviderKind;
use crate::{Error, Result, TRACING_TARGET};

enum RigModel {
    OpenAi(openai::EmbeddingModel),
    Cohere(cohere::EmbeddingModel),
    Gemini(gemini::embedding::EmbeddingModel),
}

/// Embedding provider that wraps the rig model of one hosted provider.
///
/// The rig model is bound to a single model name at construction; the
/// request's model field is only used for logging.
pub struct RigEmbeddingProvider {
    model: RigModel,
    model_name: String,
}

impl RigEmbeddingProvider {
    /// Connects to an OpenAI embedding model.
    pub fn openai(api_key: &str, model_name: &str, ndims: usize) -> Result<Self> {
        let client =
            openai::Client::new(api_key).map_err(|e| Error::provider("openai", e.to_string()))?;

        Ok(Self {
            model: RigModel::OpenAi(client.embedding_model_with_ndims(model_name, ndims)),
            model_name: model_name.to_owned(),
        })
    }

    /// Connects to a Cohere embedding model, embedding inputs as documents.
    pub fn cohere(api_key: &str, model_name: &str, ndims: usize) -> Result<Self> {
        let client =
            cohere::Client::new(api_key).map_err(|e| Error::provider("cohere", e.to_string()))?;

        Ok(Self {
            model: RigModel::Cohere(client.embedding_model_with_ndims(
                model_name,
                "search_document",
                ndims,
            )),
            model_name: model_name.to_owned(),
        })
    }

    /// Connects to a Google Gemini embedding model.
    pub fn gemini(api_key: &str, model_name: &str, ndims: usize) -> Result<Self> {
        let client =
            gemini::Client::new(api_key).map_err(|e| Error::provider("gemini", e.to_string()))?;

        Ok(Self {
            model: RigModel::Gemini(client.embedding_model_with_ndims(model_name, ndims)),
            model_name: model_name.to_owned(),
        })
    }

    /// Returns the provider kind.
    pub fn kind(&self) -> EmbeddingProviderKind {
        match self.model {
            RigModel::OpenAi(_) => EmbeddingProviderKind::OpenAi,
            RigModel::Cohere(_) => EmbeddingProviderKind::Cohere,
            RigModel::Gemini(_) => EmbeddingProviderKind::Gemini,
        }
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the number of dimensions produced by the model.
    pub fn ndims(&self) -> usize {
        match &self.model {
            RigModel::OpenAi(model) => model.ndims(),
            RigModel::Cohere(model) => model.ndims(),
            RigModel::Gemini(model) => model.ndims(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for RigEmbeddingProvider {
    async fn embed(&self, request: &EmbeddingRequest) -> CoreResult<EmbeddingVector> {
        let result = match &self.model {
            RigModel::OpenAi(model) => model.embed_text(&request.input).await,
            RigModel::Cohere(model) => model.embed_text(&request.input).await,
            RigModel::Gemini(model) => model.embed_text(&request.input).await,
        };

        match result {
            Ok(embedding) => Ok(EmbeddingVector::new(embedding.vec)),
            Err(err) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    provider = self.kind().as_str(),
                    model = %request.model,
                    error = %err,
                    "Embedding request failed"
                );
                Err(Error::provider(self.kind(), err).into())
            }
        }
    }

    async fn health_check(&self) -> CoreResult<ServiceHealth> {
        // Hosted APIs are not probed; a constructed client is considered ready.
        Ok(ServiceHealth::healthy())
    }
}

impl fmt::Debug for RigEmbeddingProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigEmbeddingProvider")
            .field("provider", &self.kind())
            .field("model", &self.model_name)
            .field("ndims", &self.ndims())
            .finish()
    }
}
