//! Request-level stages that run before any item is scheduled.

use metavec_opendal::Namespace;

use super::TRACING_TARGET;
use crate::error::{PipelineError, PipelineResult};

/// Ensures the output namespace exists before anything is written to it.
#[derive(Debug, Clone)]
pub struct ContainerProvisioner {
    target: Namespace,
}

impl ContainerProvisioner {
    pub fn new(target: Namespace) -> Self {
        Self { target }
    }

    /// Creates the output namespace if it is missing. Idempotent.
    pub async fn ensure_output_namespace_exists(&self) -> PipelineResult<()> {
        let created = self.target.ensure_exists().await.map_err(|source| {
            PipelineError::Provisioning {
                namespace: self.target.name().to_owned(),
                source,
            }
        })?;

        if created {
            tracing::info!(
                target: TRACING_TARGET,
                namespace = %self.target.name(),
                "Provisioned output namespace"
            );
        }

        Ok(())
    }
}

/// Lists the source objects that belong to a user.
#[derive(Debug, Clone)]
pub struct ObjectEnumerator {
    source: Namespace,
}

impl ObjectEnumerator {
    pub fn new(source: Namespace) -> Self {
        Self { source }
    }

    /// Returns every identifier below `{user_id}/`, in no particular order.
    pub async fn list_user_objects(&self, user_id: &str) -> PipelineResult<Vec<String>> {
        let prefix = format!("{user_id}/");
        let identifiers = self.source.list_prefix(&prefix).await.map_err(|source| {
            PipelineError::Enumeration {
                user_id: user_id.to_owned(),
                source,
            }
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id = %user_id,
            count = identifiers.len(),
            "Enumerated user objects"
        );

        Ok(identifiers)
    }
}

#[cfg(test)]
mod tests {
    use metavec_test::memory_namespaces;

    use super::*;

    #[tokio::test]
    async fn provisioning_is_idempotent() {
        let storage = memory_namespaces().await;
        let provisioner = ContainerProvisioner::new(storage.embeddings.clone());

        provisioner.ensure_output_namespace_exists().await.unwrap();
        provisioner.ensure_output_namespace_exists().await.unwrap();
    }

    #[tokio::test]
    async fn enumerates_only_the_users_objects() {
        let storage = memory_namespaces().await;
        storage.put_metadata("u1/a.json", "{}").await;
        storage.put_metadata("u1/b.json", "{}").await;
        storage.put_metadata("u12/c.json", "{}").await;

        let enumerator = ObjectEnumerator::new(storage.metadata.clone());
        let mut identifiers = enumerator.list_user_objects("u1").await.unwrap();
        identifiers.sort();

        assert_eq!(identifiers, vec!["u1/a.json", "u1/b.json"]);
        assert!(enumerator.list_user_objects("u2").await.unwrap().is_empty());
    }
}
