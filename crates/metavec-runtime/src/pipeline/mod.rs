//! The metadata-to-embedding conversion pipeline.
//!
//! [`Pipeline::process_user`] provisions the output namespace, enumerates
//! the user's metadata objects, transforms them on a bounded worker pool and
//! aggregates the outcomes into a [`BatchResult`].
//! [`Pipeline::process_single`] runs the same transformation for one object.

mod config;
mod outcome;
mod pool;
mod record;
mod stages;
mod transformer;

use std::time::Instant;

pub use config::{
    DEFAULT_EMBEDDING_TIMEOUT_SECS, DEFAULT_EMBEDDINGS_NAMESPACE, DEFAULT_MAX_CONCURRENT_JOBS,
    DEFAULT_METADATA_NAMESPACE, PipelineConfig,
};
use metavec_core::emb::EmbeddingService;
use metavec_opendal::Namespace;
pub use outcome::{BatchResult, FailedItem, ItemOutcome};
pub use pool::WorkerPool;
pub use record::{EmbeddingRecord, MetadataRecord, UNKNOWN_PATH};
pub use stages::{ContainerProvisioner, ObjectEnumerator};
pub use transformer::ItemTransformer;

use crate::error::PipelineResult;

/// Tracing target for pipeline operations.
pub const TRACING_TARGET: &str = "metavec_runtime::pipeline";

/// Prefixes `blob_name` with `{user_id}/` unless it already starts with it.
pub fn normalize_identifier(user_id: &str, blob_name: &str) -> String {
    let prefix = format!("{user_id}/");
    if blob_name.starts_with(&prefix) {
        blob_name.to_owned()
    } else {
        format!("{prefix}{blob_name}")
    }
}

/// Entry point of the conversion pipeline.
///
/// Built once at startup and cloned into every request.
#[derive(Debug, Clone)]
pub struct Pipeline {
    provisioner: ContainerProvisioner,
    enumerator: ObjectEnumerator,
    transformer: ItemTransformer,
    pool: WorkerPool,
}

impl Pipeline {
    /// Creates a pipeline reading from `source` and writing to `target`.
    pub fn new(
        source: Namespace,
        target: Namespace,
        embeddings: EmbeddingService,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            provisioner: ContainerProvisioner::new(target.clone()),
            enumerator: ObjectEnumerator::new(source.clone()),
            transformer: ItemTransformer::new(
                source,
                target,
                embeddings,
                config.embedding_timeout(),
            ),
            pool: WorkerPool::new(config.max_concurrent_jobs),
        }
    }

    /// Converts every metadata object of `user_id`.
    ///
    /// Fails only if provisioning or enumeration fails; per-item failures
    /// are reported in the returned [`BatchResult`].
    #[tracing::instrument(skip(self), target = TRACING_TARGET, name = "process_user")]
    pub async fn process_user(&self, user_id: &str) -> PipelineResult<BatchResult> {
        let started = Instant::now();

        self.provisioner.ensure_output_namespace_exists().await?;
        let identifiers = self.enumerator.list_user_objects(user_id).await?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user_id,
            jobs = identifiers.len(),
            concurrency = self.pool.limit(),
            "Starting batch"
        );

        let transformer = self.transformer.clone();
        let outcomes = self
            .pool
            .run_all(identifiers, move |identifier| {
                let transformer = transformer.clone();
                async move { transformer.transform(identifier).await }
            })
            .await;

        let result: BatchResult = outcomes.into_iter().collect();

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %user_id,
            processed = result.processed.len(),
            failed = result.failed.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Batch completed"
        );

        Ok(result)
    }

    /// Converts a single object of `user_id`.
    ///
    /// `blob_name` may be given with or without the `{user_id}/` prefix; the
    /// returned outcome carries the normalized identifier.
    #[tracing::instrument(skip(self), target = TRACING_TARGET, name = "process_single")]
    pub async fn process_single(
        &self,
        user_id: &str,
        blob_name: &str,
    ) -> PipelineResult<ItemOutcome> {
        let identifier = normalize_identifier(user_id, blob_name);

        self.provisioner.ensure_output_namespace_exists().await?;
        Ok(self.transformer.transform(identifier).await)
    }
}
