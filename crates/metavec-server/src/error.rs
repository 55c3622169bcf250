//! Startup errors of the service layer.
//!
//! Raised while building the [`ServiceState`]; request handling reports
//! failures through [`handler::Error`] instead.
//!
//! [`ServiceState`]: crate::service::ServiceState
//! [`handler::Error`]: crate::handler::Error

use metavec_opendal::StorageError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why the service could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A setting is invalid on its own, before anything is contacted.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The storage backend or a namespace could not be set up.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },

    /// The embedding provider could not be built.
    #[error("failed to create embedding provider: {0}")]
    Embeddings(#[from] metavec_rig::Error),
}

impl Error {
    pub(crate) fn storage(context: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { context, source }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn storage_error_keeps_context_and_source() {
        let source = StorageError::Unsupported("s3".to_owned());
        let error = Error::storage("failed to initialize storage backend")(source);

        assert_eq!(
            error.to_string(),
            "failed to initialize storage backend: storage backend 's3' is not enabled in this build"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn rig_errors_convert() {
        let error = Error::from(metavec_rig::Error::config("missing api key"));
        assert!(matches!(error, Error::Embeddings(_)));
        assert!(error.to_string().contains("missing api key"));
    }
}
