//! Configuration of the services shared by all handlers.

#[cfg(feature = "config")]
use clap::Args;
use metavec_core::emb::EmbeddingService;
use metavec_opendal::{StorageBackend, StorageConfig};
use metavec_rig::EmbeddingConfig;
use metavec_runtime::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Object storage backend holding both namespaces.
    #[cfg_attr(feature = "config", command(flatten))]
    pub storage: StorageConfig,

    /// Embedding provider and model.
    #[cfg_attr(feature = "config", command(flatten))]
    pub embedding: EmbeddingConfig,

    /// Concurrency, timeouts and namespace names.
    #[cfg_attr(feature = "config", command(flatten))]
    pub pipeline: PipelineConfig,
}

impl ServiceConfig {
    /// Validates the settings that can be checked without connecting.
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate().map_err(Error::Config)
    }

    /// Connects to the configured storage backend.
    pub async fn connect_storage(&self) -> Result<StorageBackend> {
        StorageBackend::new(self.storage.clone())
            .await
            .map_err(Error::storage("failed to initialize storage backend"))
    }

    /// Builds the configured embedding provider.
    pub fn connect_embeddings(&self) -> Result<EmbeddingService> {
        Ok(self.embedding.connect()?)
    }
}
