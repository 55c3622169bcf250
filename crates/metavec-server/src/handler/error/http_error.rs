//! Request-level errors returned by the embedding handlers.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// A request-level failure.
///
/// The [`ErrorKind`] picks the status code and the default message of the
/// rendered [`ErrorResponse`]; the optional parts refine it.
#[derive(Debug, Clone, Default)]
#[must_use = "errors do nothing unless rendered into a response"]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    resource: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates an error of the given kind without details.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl<'a> Error<'a> {
    /// Appends a message to the kind's default message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names the request field, user or namespace the error is about.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    fn render(self) -> ErrorResponse<'a> {
        let mut response = self.kind.response();
        if let Some(message) = self.message {
            response = response.with_message(message);
        }
        if let Some(resource) = self.resource {
            response = response.with_resource(resource);
        }
        if let Some(context) = self.context {
            response = response.with_context(context);
        }
        response
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.clone().render();
        write!(f, "{} ({}): {}", response.name, response.status, response.message)?;
        if let Some(resource) = &response.resource {
            write!(f, " [{resource}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.render().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type of the HTTP handlers.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Every error class a handler can answer with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400, a required body field is missing or empty.
    MissingParameter,
    /// 400, the body could not be decoded.
    BadRequest,
    /// 404, no such route.
    NotFound,
    /// 500, the request could not be completed.
    #[default]
    InternalServerError,
    /// 503, a backing service is unreachable.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Starts an [`Error`] of this kind with a message.
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_message(message)
    }

    /// Starts an [`Error`] of this kind about a resource.
    pub fn with_resource<'a>(self, resource: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error::new(self).with_resource(resource)
    }

    /// Returns the response template of this kind.
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingParameter => ErrorResponse::MISSING_PARAMETER,
            Self::BadRequest => ErrorResponse::BAD_REQUEST,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => ErrorResponse::SERVICE_UNAVAILABLE,
        }
    }

    pub fn status_code(self) -> StatusCode {
        self.response().status
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response().name)
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_internal_server_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn missing_parameter_renders_400() {
        let error = ErrorKind::MissingParameter
            .with_message("Missing user_id in request")
            .with_resource("user_id");

        assert_eq!(error.resource(), Some("user_id"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn builder_keeps_every_part() {
        let error = ErrorKind::InternalServerError
            .with_message("Batch aborted")
            .with_resource("files-embeddings")
            .with_context("permission denied");

        assert_eq!(error.message(), Some("Batch aborted"));
        assert_eq!(error.resource(), Some("files-embeddings"));
        assert_eq!(error.context(), Some("permission denied"));
    }

    #[test]
    fn display_names_kind_status_and_resource() {
        let display = ErrorKind::MissingParameter
            .with_message("Missing blob_name in request")
            .with_resource("blob_name")
            .to_string();

        assert!(display.starts_with("missing_parameter (400 Bad Request)"));
        assert!(display.contains("Missing blob_name in request"));
        assert!(display.ends_with("[blob_name]"));
    }

    #[test]
    fn kind_status_matches_rendered_status() {
        for kind in [
            ErrorKind::MissingParameter,
            ErrorKind::BadRequest,
            ErrorKind::NotFound,
            ErrorKind::InternalServerError,
            ErrorKind::ServiceUnavailable,
        ] {
            assert_eq!(kind.into_response().status(), kind.status_code());
        }
    }
}
