//! Storage error types.

use opendal::ErrorKind;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failures of the object store or of the paths handed to it.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The operator could not be built from the configuration.
    #[error("cannot open storage backend: {0}")]
    Init(#[source] opendal::Error),

    /// The configured backend was not compiled into this build.
    #[error("storage backend '{0}' is not enabled in this build")]
    Unsupported(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A namespace name or directory path is malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("backend error: {0}")]
    Backend(#[source] opendal::Error),
}

impl StorageError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Whether the object or namespace is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Backend(err),
        }
    }
}
