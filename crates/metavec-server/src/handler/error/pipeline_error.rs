//! Conversion of fatal pipeline failures into HTTP errors.

use metavec_runtime::PipelineError;

use crate::handler::{Error, ErrorKind};

impl From<PipelineError> for Error<'static> {
    fn from(error: PipelineError) -> Self {
        match &error {
            PipelineError::Provisioning { namespace, .. } => ErrorKind::InternalServerError
                .with_message("Failed to prepare the output container")
                .with_resource(namespace.clone())
                .with_context(error.to_string()),
            PipelineError::Enumeration { user_id, .. } => ErrorKind::InternalServerError
                .with_message("Failed to list the user's metadata files")
                .with_resource(user_id.clone())
                .with_context(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use metavec_opendal::StorageError;

    use super::*;

    #[test]
    fn provisioning_failure_is_internal_error() {
        let error = Error::from(PipelineError::Provisioning {
            namespace: "files-embeddings".to_owned(),
            source: StorageError::PermissionDenied("read-only bucket".to_owned()),
        });

        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.resource(), Some("files-embeddings"));
        assert!(error.context().is_some_and(|c| c.contains("read-only bucket")));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn enumeration_failure_names_the_user() {
        let error = Error::from(PipelineError::Enumeration {
            user_id: "u1".to_owned(),
            source: StorageError::Unsupported("azblob".to_owned()),
        });

        assert_eq!(error.resource(), Some("u1"));
        assert!(error.context().is_some_and(|c| c.contains("u1")));
    }
}
