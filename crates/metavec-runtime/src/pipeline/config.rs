//! Pipeline configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default maximum number of items transformed at the same time.
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 5;

/// Default upper bound on a single embedding call, in seconds.
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 60;

/// Default namespace holding metadata records.
pub const DEFAULT_METADATA_NAMESPACE: &str = "files-metadata";

/// Default namespace receiving embedding records.
pub const DEFAULT_EMBEDDINGS_NAMESPACE: &str = "files-embeddings";

/// Pipeline behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct PipelineConfig {
    /// Maximum items transformed concurrently within one batch.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "pipeline-max-concurrent-jobs",
            env = "PIPELINE_MAX_CONCURRENT_JOBS",
            default_value_t = DEFAULT_MAX_CONCURRENT_JOBS
        )
    )]
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Upper bound on a single embedding call, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embedding-timeout",
            env = "EMBEDDING_TIMEOUT",
            default_value_t = DEFAULT_EMBEDDING_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_embedding_timeout_secs")]
    pub embedding_timeout_secs: u64,

    /// Namespace holding metadata records.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "metadata-namespace",
            env = "METADATA_NAMESPACE",
            default_value = DEFAULT_METADATA_NAMESPACE
        )
    )]
    #[serde(default = "default_metadata_namespace")]
    pub metadata_namespace: String,

    /// Namespace receiving embedding records.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embeddings-namespace",
            env = "EMBEDDINGS_NAMESPACE",
            default_value = DEFAULT_EMBEDDINGS_NAMESPACE
        )
    )]
    #[serde(default = "default_embeddings_namespace")]
    pub embeddings_namespace: String,
}

fn default_max_concurrent_jobs() -> usize {
    DEFAULT_MAX_CONCURRENT_JOBS
}

fn default_embedding_timeout_secs() -> u64 {
    DEFAULT_EMBEDDING_TIMEOUT_SECS
}

fn default_metadata_namespace() -> String {
    DEFAULT_METADATA_NAMESPACE.to_owned()
}

fn default_embeddings_namespace() -> String {
    DEFAULT_EMBEDDINGS_NAMESPACE.to_owned()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            embedding_timeout_secs: DEFAULT_EMBEDDING_TIMEOUT_SECS,
            metadata_namespace: default_metadata_namespace(),
            embeddings_namespace: default_embeddings_namespace(),
        }
    }
}

impl PipelineConfig {
    /// Sets the concurrency limit.
    pub fn with_max_concurrent_jobs(mut self, max_concurrent_jobs: usize) -> Self {
        self.max_concurrent_jobs = max_concurrent_jobs;
        self
    }

    /// Returns the embedding timeout.
    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_secs(self.embedding_timeout_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_jobs == 0 {
            return Err("max concurrent jobs must be at least 1".to_owned());
        }

        if self.embedding_timeout_secs == 0 {
            return Err("embedding timeout must be at least 1 second".to_owned());
        }

        if self.metadata_namespace == self.embeddings_namespace {
            return Err("metadata and embeddings namespaces must differ".to_owned());
        }

        Ok(())
    }
}
