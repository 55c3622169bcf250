//! Application state and dependency injection.

use metavec_core::emb::EmbeddingService;
use metavec_opendal::{Namespace, StorageBackend};
use metavec_runtime::{Pipeline, PipelineConfig};

use crate::service::{Error, Result, ServiceConfig};

/// Tracing target for service state construction.
const TRACING_TARGET: &str = "metavec_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pipeline: Pipeline,
    storage: StorageBackend,
    embeddings: EmbeddingService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the storage backend and builds the embedding provider.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let storage = config.connect_storage().await?;
        let embeddings = config.connect_embeddings()?;

        Self::new(storage, embeddings, &config.pipeline)
    }

    /// Builds the state from already connected services.
    pub fn new(
        storage: StorageBackend,
        embeddings: EmbeddingService,
        config: &PipelineConfig,
    ) -> Result<Self> {
        let source = Namespace::new(storage.clone(), config.metadata_namespace.as_str())
            .map_err(Error::storage("invalid metadata namespace"))?;
        let target = Namespace::new(storage.clone(), config.embeddings_namespace.as_str())
            .map_err(Error::storage("invalid embeddings namespace"))?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %storage.backend_type(),
            model = %embeddings.model(),
            metadata_namespace = %source.name(),
            embeddings_namespace = %target.name(),
            max_concurrent_jobs = config.max_concurrent_jobs,
            "Service state initialized"
        );

        let pipeline = Pipeline::new(source, target, embeddings.clone(), config);

        Ok(Self {
            pipeline,
            storage,
            embeddings,
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pipeline: Pipeline);
impl_di!(storage: StorageBackend);
impl_di!(embeddings: EmbeddingService);
