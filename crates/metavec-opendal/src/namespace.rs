//! Logical containers inside a storage backend.

use std::fmt;
use std::sync::Arc;

use crate::TRACING_TARGET;
use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// A named group of objects, stored as a top-level directory of the backend.
///
/// All identifiers passed to a namespace are relative to it:
/// `files-metadata` + `u1/report.json` maps to the backend path
/// `files-metadata/u1/report.json`.
#[derive(Clone)]
pub struct Namespace {
    backend: StorageBackend,
    name: Arc<str>,
}

impl Namespace {
    /// Binds a namespace name to a backend.
    ///
    /// Names must be non-empty and must not contain `/`.
    pub fn new(backend: StorageBackend, name: impl Into<String>) -> StorageResult<Self> {
        let name: String = name.into();
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(StorageError::invalid_path(format!(
                "invalid namespace name: '{name}'"
            )));
        }

        Ok(Self {
            backend,
            name: Arc::from(name),
        })
    }

    /// Returns the namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying backend.
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    fn root(&self) -> String {
        format!("{}/", self.name)
    }

    fn object_path(&self, identifier: &str) -> StorageResult<String> {
        check_relative(identifier, false)?;
        Ok(format!("{}/{}", self.name, identifier))
    }

    fn prefix_path(&self, prefix: &str) -> StorageResult<String> {
        check_relative(prefix, true)?;
        Ok(format!("{}/{}", self.name, prefix))
    }

    /// Checks whether the namespace exists.
    pub async fn exists(&self) -> StorageResult<bool> {
        self.backend.exists(&self.root()).await
    }

    /// Creates the namespace.
    pub async fn create(&self) -> StorageResult<()> {
        self.backend.create_dir(&self.root()).await?;
        tracing::info!(target: TRACING_TARGET, namespace = %self.name, "Namespace created");
        Ok(())
    }

    /// Creates the namespace if it does not exist yet.
    ///
    /// Returns `true` if the namespace was created by this call.
    pub async fn ensure_exists(&self) -> StorageResult<bool> {
        if self.exists().await? {
            tracing::debug!(target: TRACING_TARGET, namespace = %self.name, "Namespace exists");
            return Ok(false);
        }

        self.create().await?;
        Ok(true)
    }

    /// Lists the identifiers of every object whose identifier starts with
    /// `prefix`.
    ///
    /// A prefix with no objects below it yields an empty list.
    pub async fn list_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let root = self.root();
        let path = self.prefix_path(prefix)?;

        let paths = match self.backend.list_recursive(&path).await {
            Ok(paths) => paths,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };

        Ok(paths
            .into_iter()
            .filter_map(|path| path.strip_prefix(&root).map(str::to_owned))
            .collect())
    }

    /// Reads the object stored under `identifier`.
    pub async fn read(&self, identifier: &str) -> StorageResult<Vec<u8>> {
        self.backend.read(&self.object_path(identifier)?).await
    }

    /// Writes `data` under `identifier`, replacing any previous object.
    pub async fn write(&self, identifier: &str, data: Vec<u8>) -> StorageResult<()> {
        self.backend.write(&self.object_path(identifier)?, data).await
    }
}

/// Rejects paths that could resolve outside the namespace: a leading `/`,
/// backslashes, and empty, `.` or `..` segments. Prefixes may be empty or end
/// with `/`.
fn check_relative(path: &str, is_prefix: bool) -> StorageResult<()> {
    if is_prefix && path.is_empty() {
        return Ok(());
    }

    let segments = match path.strip_suffix('/') {
        Some(stripped) if is_prefix => stripped,
        _ => path,
    };

    let escapes = path.starts_with('/')
        || path.contains('\\')
        || segments
            .split('/')
            .any(|segment| matches!(segment, "" | "." | ".."));

    if escapes {
        return Err(StorageError::invalid_path(format!(
            "identifier must be a relative path without '.' or '..' segments: '{path}'"
        )));
    }

    Ok(())
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("backend", &self.backend)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageConfig;

    async fn namespace(name: &str) -> Namespace {
        let backend = StorageBackend::new(StorageConfig::memory()).await.unwrap();
        Namespace::new(backend, name).unwrap()
    }

    #[tokio::test]
    async fn rejects_invalid_names() {
        let backend = StorageBackend::new(StorageConfig::memory()).await.unwrap();
        assert!(Namespace::new(backend.clone(), "").is_err());
        assert!(Namespace::new(backend.clone(), "a/b").is_err());
        assert!(Namespace::new(backend, "..").is_err());
    }

    #[tokio::test]
    async fn ensure_exists_is_idempotent() {
        let ns = namespace("files-embeddings").await;
        ns.ensure_exists().await.unwrap();
        ns.ensure_exists().await.unwrap();
    }

    #[tokio::test]
    async fn list_prefix_scopes_to_user() {
        let backend = StorageBackend::new(StorageConfig::memory()).await.unwrap();
        let ns = Namespace::new(backend.clone(), "files-metadata").unwrap();
        let other = Namespace::new(backend, "files-embeddings").unwrap();

        ns.write("u1/a.json", b"{}".to_vec()).await.unwrap();
        ns.write("u1/nested/b.json", b"{}".to_vec()).await.unwrap();
        ns.write("u10/c.json", b"{}".to_vec()).await.unwrap();
        other.write("u1/d.json", b"{}".to_vec()).await.unwrap();

        let mut listed = ns.list_prefix("u1/").await.unwrap();
        listed.sort();
        assert_eq!(listed, vec!["u1/a.json", "u1/nested/b.json"]);
    }

    #[tokio::test]
    async fn list_prefix_of_unknown_user_is_empty() {
        let ns = namespace("files-metadata").await;
        assert!(ns.list_prefix("nobody/").await.unwrap().is_empty());
    }

    #[test]
    fn relative_path_rules() {
        for valid in ["u1/a.json", "u1/nested/b.json", "a..b.json"] {
            assert!(check_relative(valid, false).is_ok(), "{valid}");
        }
        for invalid in [
            "",
            "/u1/a.json",
            "u1/../a.json",
            "../secret.json",
            "u1/./a.json",
            "u1//a.json",
            "u1/",
            "u1\\..\\a.json",
        ] {
            assert!(check_relative(invalid, false).is_err(), "{invalid}");
        }

        assert!(check_relative("", true).is_ok());
        assert!(check_relative("u1/", true).is_ok());
        assert!(check_relative("../", true).is_err());
        assert!(check_relative("./", true).is_err());
    }

    #[tokio::test]
    async fn traversal_never_reaches_the_backend() {
        let backend = StorageBackend::new(StorageConfig::memory()).await.unwrap();
        let ns = Namespace::new(backend.clone(), "files-embeddings").unwrap();
        backend
            .write("files-metadata/u1/a.json", b"{}".to_vec())
            .await
            .unwrap();

        let read = ns.read("../files-metadata/u1/a.json").await;
        assert!(matches!(read, Err(StorageError::InvalidPath(_))));

        let write = ns.write("u1/../../outside.json", b"{}".to_vec()).await;
        assert!(matches!(write, Err(StorageError::InvalidPath(_))));
        assert!(!backend.exists("outside.json").await.unwrap());

        let listed = ns.list_prefix("../").await;
        assert!(matches!(listed, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn read_and_write_are_namespace_relative() {
        let ns = namespace("files-embeddings").await;
        ns.write("u1/a.json", b"payload".to_vec()).await.unwrap();

        assert_eq!(ns.read("u1/a.json").await.unwrap(), b"payload");
        assert_eq!(
            ns.backend().read("files-embeddings/u1/a.json").await.unwrap(),
            b"payload"
        );
    }
}
