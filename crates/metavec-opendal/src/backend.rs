//! Storage backend implementation.

use std::fmt;
use std::time::Instant;

use metavec_core::ServiceHealth;
use opendal::{Builder, Operator, services};

use crate::TRACING_TARGET;
use crate::config::{BackendType, StorageConfig};
use crate::error::{StorageError, StorageResult};

/// Unified storage backend that wraps an OpenDAL operator.
///
/// Cloning is cheap: the operator is reference counted internally.
#[derive(Clone)]
pub struct StorageBackend {
    operator: Operator,
    config: StorageConfig,
}

impl StorageBackend {
    /// Creates a new storage backend from configuration.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let operator = Self::create_operator(&config)?;

        tracing::info!(
            target: TRACING_TARGET,
            backend = %config.backend_type,
            root = %config.root,
            "Storage backend initialized"
        );

        Ok(Self { operator, config })
    }

    /// Returns the configuration for this backend.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Returns the backend type.
    pub fn backend_type(&self) -> BackendType {
        self.config.backend_type
    }

    /// Reads an object.
    pub async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        tracing::debug!(target: TRACING_TARGET, path = %path, "Reading object");

        let data = self.operator.read(path).await?.to_vec();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            size = data.len(),
            "Object read complete"
        );

        Ok(data)
    }

    /// Writes an object, replacing any previous content.
    pub async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let size = data.len();
        tracing::debug!(target: TRACING_TARGET, path = %path, size, "Writing object");

        self.operator.write(path, data).await?;

        tracing::debug!(target: TRACING_TARGET, path = %path, "Object write complete");
        Ok(())
    }

    /// Checks if an object or directory exists.
    pub async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.operator.exists(path).await?)
    }

    /// Creates a directory. `path` must end with `/`.
    ///
    /// Backends without native directories (most object stores) treat this
    /// as a no-op: their directories exist implicitly once an object is
    /// written below them.
    pub async fn create_dir(&self, path: &str) -> StorageResult<()> {
        if !path.ends_with('/') {
            return Err(StorageError::invalid_path(format!(
                "directory path must end with '/': {path}"
            )));
        }

        if !self.operator.info().full_capability().create_dir {
            tracing::debug!(
                target: TRACING_TARGET,
                path = %path,
                "Backend has implicit directories, skipping creation"
            );
            return Ok(());
        }

        self.operator.create_dir(path).await?;
        tracing::debug!(target: TRACING_TARGET, path = %path, "Directory created");
        Ok(())
    }

    /// Lists every object below `path`, recursively.
    ///
    /// Directory entries are skipped. Returned paths are relative to the
    /// backend root.
    pub async fn list_recursive(&self, path: &str) -> StorageResult<Vec<String>> {
        let entries = self.operator.list_with(path).recursive(true).await?;

        let paths: Vec<String> = entries
            .into_iter()
            .filter(|entry| !entry.path().ends_with('/') && !entry.metadata().is_dir())
            .map(|entry| entry.path().to_owned())
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path,
            count = paths.len(),
            "Listed objects"
        );

        Ok(paths)
    }

    /// Verifies that the backend is reachable.
    pub async fn health_check(&self) -> ServiceHealth {
        let started = Instant::now();
        let health = match self.operator.check().await {
            Ok(()) => ServiceHealth::healthy(),
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    backend = %self.config.backend_type,
                    error = %err,
                    "Storage health check failed"
                );
                ServiceHealth::unhealthy(err.to_string())
            }
        };

        health.with_latency(started.elapsed())
    }

    fn create_operator(config: &StorageConfig) -> StorageResult<Operator> {
        match config.backend_type {
            BackendType::Memory => {
                let builder = services::Memory::default().root(&config.root);

                finish(builder)
            }

            #[cfg(feature = "fs")]
            BackendType::Fs => {
                let builder = services::Fs::default().root(&config.root);

                finish(builder)
            }

            #[cfg(feature = "s3")]
            BackendType::S3 => {
                let mut builder = services::S3::default().bucket(&config.root);

                if let Some(ref region) = config.region {
                    builder = builder.region(region);
                }

                if let Some(ref endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                if let Some(ref access_key_id) = config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }

                if let Some(ref secret_access_key) = config.secret_access_key {
                    builder = builder.secret_access_key(secret_access_key);
                }

                finish(builder)
            }

            #[cfg(feature = "azblob")]
            BackendType::AzureBlob => {
                let mut builder = match config.connection_string {
                    Some(ref connection_string) => {
                        services::Azblob::from_connection_string(connection_string)
                            .map_err(StorageError::Init)?
                    }
                    None => services::Azblob::default(),
                };

                builder = builder.container(&config.root);

                if let Some(ref account_name) = config.account_name {
                    builder = builder.account_name(account_name);
                    if config.endpoint.is_none() && config.connection_string.is_none() {
                        let endpoint = format!("https://{account_name}.blob.core.windows.net");
                        builder = builder.endpoint(&endpoint);
                    }
                }

                if let Some(ref account_key) = config.account_key {
                    builder = builder.account_key(account_key);
                }

                if let Some(ref endpoint) = config.endpoint {
                    builder = builder.endpoint(endpoint);
                }

                finish(builder)
            }

            #[allow(unreachable_patterns)]
            _ => Err(StorageError::Unsupported(config.backend_type.to_string())),
        }
    }
}

fn finish(builder: impl Builder) -> StorageResult<Operator> {
    Operator::new(builder)
        .map(|op| op.finish())
        .map_err(StorageError::Init)
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageBackend")
            .field("backend_type", &self.config.backend_type)
            .field("root", &self.config.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> StorageBackend {
        StorageBackend::new(StorageConfig::memory()).await.unwrap()
    }

    #[tokio::test]
    async fn write_overwrites_previous_content() {
        let backend = memory().await;
        backend.write("a/b.json", b"first".to_vec()).await.unwrap();
        backend.write("a/b.json", b"second".to_vec()).await.unwrap();

        assert_eq!(backend.read("a/b.json").await.unwrap(), b"second");
        assert_eq!(backend.list_recursive("a/").await.unwrap(), vec!["a/b.json"]);
    }

    #[tokio::test]
    async fn read_missing_object_is_not_found() {
        let backend = memory().await;
        let err = backend.read("missing.json").await.unwrap_err();
        assert!(err.is_not_found(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn create_dir_requires_trailing_slash() {
        let backend = memory().await;
        assert!(matches!(
            backend.create_dir("dir").await,
            Err(StorageError::InvalidPath(_))
        ));
        backend.create_dir("dir/").await.unwrap();
    }

    #[tokio::test]
    async fn memory_backend_is_healthy() {
        let backend = memory().await;
        assert!(backend.health_check().await.is_operational());
    }
}
