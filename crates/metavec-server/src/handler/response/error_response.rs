use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Body of every request-level error: `{ "name", "message", "resource"?, "context"? }`.
///
/// The status code travels with the template and is not serialized.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Stable snake_case identifier clients can match on.
    pub name: Cow<'a, str>,
    pub message: Cow<'a, str>,
    /// Request field, user or namespace the error is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Underlying cause, when it is safe to expose.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const MISSING_PARAMETER: Self = Self::template(
        "missing_parameter",
        "Invalid request: missing required parameters",
        StatusCode::BAD_REQUEST,
    );
    pub const BAD_REQUEST: Self = Self::template(
        "bad_request",
        "The request body could not be decoded",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::template(
        "not_found",
        "No such endpoint",
        StatusCode::NOT_FOUND,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::template(
        "internal_server_error",
        "The request could not be completed",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::template(
        "service_unavailable",
        "A backing service is unavailable",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    const fn template(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Appends `message` to the template message as `"{default}. {message}"`.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Cow::Owned(format!("{}. {}", self.message, message.into()));
        self
    }

    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the context, joining with `; ` when one is already present.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(existing) => Cow::Owned(format!("{existing}; {context}")),
            None => context,
        });
        self
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_appended_to_default() {
        let response = ErrorResponse::MISSING_PARAMETER.with_message("Missing user_id in request");

        assert_eq!(
            response.message,
            "Invalid request: missing required parameters. Missing user_id in request"
        );
    }

    #[test]
    fn contexts_are_joined() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("listing failed")
            .with_context("backend timed out");

        assert_eq!(
            response.context.as_deref(),
            Some("listing failed; backend timed out")
        );
    }

    #[test]
    fn status_and_empty_parts_are_not_serialized() {
        let response = ErrorResponse::MISSING_PARAMETER.with_resource("user_id");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "missing_parameter",
                "message": "Invalid request: missing required parameters",
                "resource": "user_id",
            })
        );
    }
}
