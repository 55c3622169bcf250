//! Azure OpenAI embedding deployments.

use std::fmt;

use metavec_core::emb::{EmbeddingProvider, EmbeddingRequest, EmbeddingVector};
use metavec_core::{Error as CoreError, ErrorKind, Result as CoreResult, ServiceHealth};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result, TRACING_TARGET};

/// Maximum number of characters of an unparseable error body kept in messages.
const MAX_ERROR_BODY: usize = 512;

/// Embedding provider for an Azure OpenAI deployment.
///
/// Requests are sent to
/// `{endpoint}/openai/deployments/{deployment}/embeddings?api-version={version}`
/// with the key in the `api-key` header.
#[derive(Clone)]
pub struct AzureOpenAiProvider {
    http: Client,
    url: Url,
    api_key: String,
    deployment: String,
}

#[derive(Serialize)]
struct EmbeddingsBody<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

impl AzureOpenAiProvider {
    /// Creates a provider for the given resource endpoint and deployment.
    pub fn new(
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        api_key: impl Into<String>,
    ) -> Result<Self> {
        let url = Self::deployment_url(endpoint, deployment, api_version)?;
        let http = Client::builder()
            .user_agent(format!("metavec/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::provider("azure-openai", e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            "Azure OpenAI provider created"
        );

        Ok(Self {
            http,
            url,
            api_key: api_key.into(),
            deployment: deployment.to_owned(),
        })
    }

    /// Returns the deployment name.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    fn deployment_url(endpoint: &str, deployment: &str, api_version: &str) -> Result<Url> {
        if deployment.is_empty() || deployment.contains('/') {
            return Err(Error::config(format!("invalid deployment name: '{deployment}'")));
        }

        let base = format!("{}/", endpoint.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .and_then(|base| base.join(&format!("openai/deployments/{deployment}/embeddings")))
            .map_err(|e| Error::config(format!("invalid endpoint '{endpoint}': {e}")))?;

        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    fn status_kind(status: StatusCode) -> ErrorKind {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
            StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ErrorKind::Timeout,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::InvalidInput,
            status if status.is_server_error() => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::ExternalError,
        }
    }

    fn error_message(status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => match error.code {
                Some(code) => format!("HTTP {}: {code}: {}", status.as_u16(), error.message),
                None => format!("HTTP {}: {}", status.as_u16(), error.message),
            },
            Err(_) => {
                let body: String = body.chars().take(MAX_ERROR_BODY).collect();
                format!("HTTP {}: {body}", status.as_u16())
            }
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for AzureOpenAiProvider {
    async fn embed(&self, request: &EmbeddingRequest) -> CoreResult<EmbeddingVector> {
        let body = EmbeddingsBody {
            input: &request.input,
            model: &request.model,
        };

        let response = self
            .http
            .post(self.url.clone())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                let kind = if err.is_timeout() {
                    ErrorKind::Timeout
                } else {
                    ErrorKind::NetworkError
                };
                CoreError::new(kind).with_message(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = Self::error_message(status, &body);

            tracing::debug!(
                target: TRACING_TARGET,
                deployment = %self.deployment,
                status = status.as_u16(),
                error = %message,
                "Azure OpenAI rejected embedding request"
            );

            return Err(CoreError::new(Self::status_kind(status)).with_message(message));
        }

        let payload: EmbeddingsResponse = response.json().await.map_err(|err| {
            CoreError::malformed_response().with_message(format!("invalid embeddings payload: {err}"))
        })?;

        payload
            .data
            .into_iter()
            .next()
            .map(|data| EmbeddingVector::new(data.embedding))
            .ok_or_else(|| {
                CoreError::malformed_response().with_message("embeddings payload has no data")
            })
    }

    async fn health_check(&self) -> CoreResult<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

impl fmt::Debug for AzureOpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiProvider")
            .field("url", &self.url.as_str())
            .field("deployment", &self.deployment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_deployment_url() {
        let provider = AzureOpenAiProvider::new(
            "https://example.openai.azure.com/",
            "text-embedding-3-large",
            "2024-12-01-preview",
            "key",
        )
        .unwrap();

        assert_eq!(
            provider.url.as_str(),
            "https://example.openai.azure.com/openai/deployments/text-embedding-3-large/embeddings?api-version=2024-12-01-preview"
        );
    }

    #[test]
    fn endpoint_without_trailing_slash_keeps_path() {
        let url = AzureOpenAiProvider::deployment_url(
            "https://proxy.internal/azure",
            "emb",
            "2024-12-01-preview",
        )
        .unwrap();
        assert_eq!(url.path(), "/azure/openai/deployments/emb/embeddings");
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(AzureOpenAiProvider::deployment_url("not a url", "emb", "v").is_err());
        assert!(AzureOpenAiProvider::deployment_url("https://a.b", "a/b", "v").is_err());
    }

    #[test]
    fn classifies_status_codes() {
        let kind = AzureOpenAiProvider::status_kind;
        assert_eq!(kind(StatusCode::UNAUTHORIZED), ErrorKind::Authentication);
        assert_eq!(kind(StatusCode::TOO_MANY_REQUESTS), ErrorKind::RateLimited);
        assert_eq!(kind(StatusCode::BAD_GATEWAY), ErrorKind::ServiceUnavailable);
        assert_eq!(kind(StatusCode::REQUEST_TIMEOUT), ErrorKind::Timeout);
        assert_eq!(kind(StatusCode::GATEWAY_TIMEOUT), ErrorKind::Timeout);
        assert_eq!(kind(StatusCode::NOT_FOUND), ErrorKind::ExternalError);
    }

    #[test]
    fn keeps_upstream_error_message() {
        let body = r#"{"error":{"code":"429","message":"Requests have exceeded the limit"}}"#;
        let message = AzureOpenAiProvider::error_message(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(message, "HTTP 429: 429: Requests have exceeded the limit");

        let message = AzureOpenAiProvider::error_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(message, "HTTP 502: upstream down");
    }
}
