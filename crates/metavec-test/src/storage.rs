//! Storage fixtures.

use metavec_opendal::{BackendType, Namespace, StorageBackend, StorageConfig};

/// Source and output namespaces over one backend.
#[derive(Debug, Clone)]
pub struct TestNamespaces {
    /// Backend shared by both namespaces.
    pub backend: StorageBackend,
    /// Namespace holding metadata records (`files-metadata`).
    pub metadata: Namespace,
    /// Namespace receiving embedding records (`files-embeddings`).
    pub embeddings: Namespace,
}

impl TestNamespaces {
    /// Writes a metadata object under `identifier`.
    pub async fn put_metadata(&self, identifier: &str, content: &str) {
        self.metadata
            .write(identifier, content.as_bytes().to_vec())
            .await
            .expect("in-memory write never fails");
    }

    /// Returns the sorted identifiers stored in the output namespace.
    pub async fn embedding_identifiers(&self, prefix: &str) -> Vec<String> {
        let mut identifiers = self
            .embeddings
            .list_prefix(prefix)
            .await
            .expect("in-memory listing never fails");
        identifiers.sort();
        identifiers
    }
}

/// Creates a fresh in-memory backend with the default namespaces bound.
pub async fn memory_namespaces() -> TestNamespaces {
    let backend = StorageBackend::new(StorageConfig::memory())
        .await
        .expect("in-memory backend always initializes");
    bind(backend)
}

/// Binds the default namespaces to a filesystem backend rooted at a regular
/// file.
///
/// The backend builds, but every operation below the root fails with a
/// non-`NotFound` error.
pub async fn unreachable_namespaces() -> TestNamespaces {
    let root = std::env::temp_dir()
        .join(format!("metavec-not-a-directory-{}", std::process::id()));
    std::fs::write(&root, b"").expect("temp dir is writable");

    let config = StorageConfig::new(BackendType::Fs, root.to_string_lossy());
    let backend = StorageBackend::new(config)
        .await
        .expect("fs backend accepts an existing path as root");
    bind(backend)
}

fn bind(backend: StorageBackend) -> TestNamespaces {
    let metadata =
        Namespace::new(backend.clone(), "files-metadata").expect("valid namespace name");
    let embeddings =
        Namespace::new(backend.clone(), "files-embeddings").expect("valid namespace name");

    TestNamespaces {
        backend,
        metadata,
        embeddings,
    }
}
