//! Errors reported by embedding providers.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Boxed error that can cross task boundaries.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a provider call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum ErrorKind {
    #[strum(to_string = "invalid input")]
    InvalidInput,
    #[strum(to_string = "authentication failed")]
    Authentication,
    #[strum(to_string = "rate limit exceeded")]
    RateLimited,
    #[strum(to_string = "network error")]
    NetworkError,
    #[strum(to_string = "operation timed out")]
    Timeout,
    #[strum(to_string = "service unavailable")]
    ServiceUnavailable,
    /// The provider answered with a payload that holds no usable vector.
    #[strum(to_string = "malformed response")]
    MalformedResponse,
    #[strum(to_string = "external service error")]
    ExternalError,
    #[strum(to_string = "configuration error")]
    Configuration,
}

/// A provider failure with an optional message and cause.
#[derive(Debug, Error)]
#[error("{kind}{}", message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    pub fn external_error() -> Self {
        Self::new(ErrorKind::ExternalError)
    }

    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    pub fn malformed_response() -> Self {
        Self::new(ErrorKind::MalformedResponse)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_message() {
        let error = Error::new(ErrorKind::RateLimited).with_message("retry after 20s");
        assert_eq!(error.to_string(), "rate limit exceeded: retry after 20s");
        assert_eq!(Error::malformed_response().to_string(), "malformed response");
        assert_eq!(
            Error::new(ErrorKind::Timeout).with_message("no answer").to_string(),
            "operation timed out: no answer"
        );
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("socket closed");
        let error = Error::external_error().with_source(io);
        let source = std::error::Error::source(&error).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }
}
