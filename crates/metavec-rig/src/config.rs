//! Provider selection and construction.

#[cfg(feature = "config")]
use clap::Args;
use metavec_core::emb::EmbeddingService;
use serde::{Deserialize, Serialize};

use crate::provider::{AzureOpenAiProvider, EmbeddingProviderKind, RigEmbeddingProvider};
use crate::{Error, Result, TRACING_TARGET};

/// Default embedding model (or Azure deployment) name.
pub const DEFAULT_MODEL: &str = "text-embedding-3-large";

/// Default Azure OpenAI REST API version.
pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

/// Configuration of the process-wide embedding provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct EmbeddingConfig {
    /// Which backend to call.
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-provider", env = "EMBEDDING_PROVIDER", default_value = "openai")
    )]
    pub provider: EmbeddingProviderKind,
    /// Model identifier; for Azure this is the deployment name.
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-model", env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL)
    )]
    pub model: String,
    /// Output dimensions; required for models missing from the built-in table.
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-dimensions", env = "EMBEDDING_DIMENSIONS")
    )]
    pub dimensions: Option<usize>,
    /// API key of the provider.
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-api-key", env = "EMBEDDING_API_KEY", hide_env_values = true)
    )]
    pub api_key: Option<String>,
    /// Resource endpoint (Azure OpenAI only).
    #[cfg_attr(
        feature = "config",
        arg(long = "embedding-endpoint", env = "EMBEDDING_ENDPOINT")
    )]
    pub endpoint: Option<String>,
    /// REST API version (Azure OpenAI only).
    #[cfg_attr(
        feature = "config",
        arg(
            long = "embedding-api-version",
            env = "EMBEDDING_API_VERSION",
            default_value = DEFAULT_API_VERSION
        )
    )]
    pub api_version: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: DEFAULT_MODEL.to_owned(),
            dimensions: None,
            api_key: None,
            endpoint: None,
            api_version: DEFAULT_API_VERSION.to_owned(),
        }
    }
}

impl EmbeddingConfig {
    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::config(format!("{} requires an API key", self.provider)))
    }

    fn ndims(&self) -> Result<usize> {
        self.dimensions
            .or_else(|| crate::provider::model::known_dimensions(self.provider, &self.model))
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown dimensions for model '{}', set them explicitly",
                    self.model
                ))
            })
    }

    /// Builds the configured provider and binds it to the configured model.
    pub fn connect(&self) -> Result<EmbeddingService> {
        if self.model.is_empty() {
            return Err(Error::config("embedding model must not be empty"));
        }

        let api_key = self.api_key()?;
        let service = match self.provider {
            EmbeddingProviderKind::OpenAi => {
                let provider = RigEmbeddingProvider::openai(api_key, &self.model, self.ndims()?)?;
                EmbeddingService::new(provider, &self.model)
            }
            EmbeddingProviderKind::Cohere => {
                let provider = RigEmbeddingProvider::cohere(api_key, &self.model, self.ndims()?)?;
                EmbeddingService::new(provider, &self.model)
            }
            EmbeddingProviderKind::Gemini => {
                let provider = RigEmbeddingProvider::gemini(api_key, &self.model, self.ndims()?)?;
                EmbeddingService::new(provider, &self.model)
            }
            EmbeddingProviderKind::AzureOpenAi => {
                let endpoint = self
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| Error::config("azure-openai requires an endpoint"))?;
                let provider =
                    AzureOpenAiProvider::new(endpoint, &self.model, &self.api_version, api_key)?;
                EmbeddingService::new(provider, &self.model)
            }
        };

        tracing::info!(
            target: TRACING_TARGET,
            provider = %self.provider,
            model = %self.model,
            "Embedding provider connected"
        );

        Ok(service)
    }
}

impl std::fmt::Debug for EmbeddingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = EmbeddingConfig::default();
        assert!(matches!(config.connect(), Err(Error::Config(_))));
    }

    #[test]
    fn azure_requires_endpoint() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::AzureOpenAi,
            api_key: Some("key".to_owned()),
            ..Default::default()
        };
        assert!(matches!(config.connect(), Err(Error::Config(_))));
    }

    #[test]
    fn azure_connects_with_endpoint() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::AzureOpenAi,
            api_key: Some("key".to_owned()),
            endpoint: Some("https://example.openai.azure.com".to_owned()),
            ..Default::default()
        };
        let service = config.connect().unwrap();
        assert_eq!(service.model(), DEFAULT_MODEL);
    }

    #[test]
    fn unknown_model_needs_dimensions() {
        let config = EmbeddingConfig {
            model: "custom-embedder".to_owned(),
            api_key: Some("key".to_owned()),
            ..Default::default()
        };
        assert!(matches!(config.ndims(), Err(Error::Config(_))));
        let config = EmbeddingConfig {
            dimensions: Some(256),
            ..config
        };
        assert_eq!(config.ndims().unwrap(), 256);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = EmbeddingConfig {
            api_key: Some("sk-secret".to_owned()),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("sk-secret"));
    }
}
