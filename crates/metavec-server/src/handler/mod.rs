//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use metavec_server::handler::routes;
//! use metavec_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let router: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod embeddings;
mod error;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and a `not_found` fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(embeddings::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use metavec_runtime::PipelineConfig;
    use metavec_test::{
        TestNamespaces, MockEmbeddingConfig, MockEmbeddingProvider, memory_namespaces,
    };

    use crate::handler::routes;
    use crate::service::ServiceState;

    /// A running test server with handles on its collaborators.
    pub struct TestContext {
        pub server: TestServer,
        pub storage: TestNamespaces,
        pub provider: MockEmbeddingProvider,
    }

    /// Returns a [`TestServer`] backed by in-memory storage and a mock provider.
    pub async fn create_test_context(config: MockEmbeddingConfig) -> anyhow::Result<TestContext> {
        create_test_context_with(memory_namespaces().await, config).await
    }

    /// Returns a [`TestServer`] over the given storage fixture.
    pub async fn create_test_context_with(
        storage: TestNamespaces,
        config: MockEmbeddingConfig,
    ) -> anyhow::Result<TestContext> {
        let provider = MockEmbeddingProvider::new(config);

        let state = ServiceState::new(
            storage.backend.clone(),
            provider.service("text-embedding-3-large"),
            &PipelineConfig::default(),
        )?;

        let server = TestServer::new(routes().with_state(state))?;
        Ok(TestContext {
            server,
            storage,
            provider,
        })
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;

        let response = context.server.get("/does-not-exist").await;
        response.assert_status_not_found();
        assert_eq!(
            response.json::<serde_json::Value>()["name"],
            "not_found"
        );
        Ok(())
    }
}
