//! Error types for metavec-rig.

use std::fmt;

/// Result type alias for provider construction.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or calling a provider.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Provider error (client construction or API call failed).
    #[error("provider error: {provider}: {message}")]
    Provider { provider: String, message: String },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a provider error.
    pub fn provider(provider: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }
}

impl From<Error> for metavec_core::Error {
    fn from(error: Error) -> Self {
        let core = match &error {
            Error::Provider { .. } => metavec_core::Error::external_error(),
            Error::Config(_) => metavec_core::Error::configuration(),
        };

        core.with_message(error.to_string())
    }
}
