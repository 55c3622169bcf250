//! Embedding processing handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use metavec_runtime::Pipeline;

use super::request::{ProcessEmbeddingsRequest, ProcessSingleRequest};
use super::response::{ProcessEmbeddingsResponse, ProcessSingleResponse};
use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for embedding processing handlers.
const TRACING_TARGET: &str = "metavec_server::handler::embeddings";

/// Converts every metadata object of a user.
///
/// Per-item failures are listed in the response; only provisioning or
/// enumeration failures turn into an error response.
#[tracing::instrument(skip_all)]
async fn process_embeddings(
    State(pipeline): State<Pipeline>,
    request: Option<Json<ProcessEmbeddingsRequest>>,
) -> Result<Json<ProcessEmbeddingsResponse>> {
    let Json(request) = request.unwrap_or_default();
    let user_id = request.user_id()?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user_id,
        "Batch processing requested"
    );

    let result = pipeline.process_user(user_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user_id,
        processed = result.processed.len(),
        failed = result.failed.len(),
        "Batch processing completed"
    );

    Ok(Json(ProcessEmbeddingsResponse::from(result)))
}

/// Converts one metadata object of a user.
///
/// Answers 200 when the embedding record was written, 500 with the item's
/// error otherwise.
#[tracing::instrument(skip_all)]
async fn process_single_embedding(
    State(pipeline): State<Pipeline>,
    request: Option<Json<ProcessSingleRequest>>,
) -> Result<(StatusCode, Json<ProcessSingleResponse>)> {
    let Json(request) = request.unwrap_or_default();
    let (user_id, blob_name) = request.parameters()?;

    let outcome = pipeline.process_single(user_id, blob_name).await?;
    let status_code = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::info!(
        target: TRACING_TARGET,
        user_id = %user_id,
        blob = %outcome.identifier(),
        status_code = status_code.as_u16(),
        "Single object processed"
    );

    Ok((status_code, Json(ProcessSingleResponse::from(outcome))))
}

/// Returns a [`Router`] with the embedding processing routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/process_embeddings", post(process_embeddings))
        .route("/process_single_embedding", post(process_single_embedding))
}

#[cfg(test)]
mod tests {
    use metavec_test::{MockEmbeddingConfig, unreachable_namespaces};
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::response::ProcessingStatus;
    use crate::handler::test::{TestContext, create_test_context, create_test_context_with};

    async fn seed(context: &TestContext) {
        let storage = &context.storage;
        storage
            .put_metadata("u1/a.json", r#"{"title":"Quarterly report","file_path":"/docs/a.pdf"}"#)
            .await;
        storage
            .put_metadata("u1/b.json", r#"{"title":"Roadmap","pages":12}"#)
            .await;
        storage.put_metadata("u1/c.json", "{not json").await;
        storage
            .put_metadata("u2/other.json", r#"{"title":"Someone else"}"#)
            .await;
    }

    #[tokio::test]
    async fn batch_reports_processed_and_failed() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;
        seed(&context).await;

        let response = context
            .server
            .post("/process_embeddings")
            .json(&json!({ "user_id": "u1" }))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["message"], "Processing completed");
        assert_eq!(
            body["result"]["processed_files"],
            json!(["u1/a.json", "u1/b.json"])
        );
        assert_eq!(body["result"]["failed_files"][0]["blob"], "u1/c.json");
        assert!(
            body["result"]["failed_files"][0]["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("parse error"))
        );

        assert_eq!(
            context.storage.embedding_identifiers("u1/").await,
            vec!["u1/a.json", "u1/b.json"]
        );
        assert!(context.storage.embedding_identifiers("u2/").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn batch_without_user_id_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;
        seed(&context).await;

        let response = context
            .server
            .post("/process_embeddings")
            .json(&json!({}))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["name"], "missing_parameter");
        assert_eq!(body["resource"], "user_id");

        assert_eq!(context.provider.stats().calls(), 0);
        assert!(context.storage.embedding_identifiers("").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn batch_without_body_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;

        let response = context.server.post("/process_embeddings").await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["name"], "missing_parameter");
        Ok(())
    }

    #[tokio::test]
    async fn batch_for_unknown_user_is_empty() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;

        let response = context
            .server
            .post("/process_embeddings")
            .json(&json!({ "user_id": "nobody" }))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["result"]["processed_files"], json!([]));
        assert_eq!(body["result"]["failed_files"], json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn single_normalizes_blob_name() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;
        seed(&context).await;

        let response = context
            .server
            .post("/process_single_embedding")
            .json(&json!({ "user_id": "u1", "blob_name": "a.json" }))
            .await;
        response.assert_status_ok();

        let body = response.json::<ProcessSingleResponse>();
        assert_eq!(body.status, ProcessingStatus::Success);
        assert_eq!(body.blob_name, "u1/a.json");
        assert_eq!(body.message, "Embeddings generated and stored successfully");

        let stored = context.storage.embeddings.read("u1/a.json").await?;
        let record: Value = serde_json::from_slice(&stored)?;
        assert_eq!(record["file_name"], "u1/a.json");
        assert_eq!(record["file_path"], "/docs/a.pdf");
        Ok(())
    }

    #[tokio::test]
    async fn single_failure_is_reported_with_500() -> anyhow::Result<()> {
        let config = MockEmbeddingConfig::default().with_failure_on("Roadmap");
        let context = create_test_context(config).await?;
        seed(&context).await;

        let response = context
            .server
            .post("/process_single_embedding")
            .json(&json!({ "user_id": "u1", "blob_name": "u1/b.json" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.json::<ProcessSingleResponse>();
        assert_eq!(body.status, ProcessingStatus::Error);
        assert_eq!(body.blob_name, "u1/b.json");
        assert!(body.message.starts_with("embedding_service error"));
        Ok(())
    }

    #[tokio::test]
    async fn single_without_blob_name_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;

        let response = context
            .server
            .post("/process_single_embedding")
            .json(&json!({ "user_id": "u1" }))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["name"], "missing_parameter");
        assert_eq!(body["resource"], "blob_name");
        assert_eq!(context.provider.stats().calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn batch_with_path_like_user_id_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;
        seed(&context).await;

        let response = context
            .server
            .post("/process_embeddings")
            .json(&json!({ "user_id": ".." }))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["name"], "bad_request");
        assert_eq!(body["resource"], "user_id");
        assert_eq!(context.provider.stats().calls(), 0);
        assert!(context.storage.embedding_identifiers("").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn single_with_traversing_blob_name_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context(MockEmbeddingConfig::default()).await?;
        seed(&context).await;
        context
            .storage
            .backend
            .write("secret.json", br#"{"title":"outside"}"#.to_vec())
            .await?;

        let response = context
            .server
            .post("/process_single_embedding")
            .json(&json!({ "user_id": "u1", "blob_name": "../../../secret.json" }))
            .await;
        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["name"], "bad_request");
        assert_eq!(body["resource"], "blob_name");
        assert_eq!(context.provider.stats().calls(), 0);
        assert!(context.storage.embedding_identifiers("").await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn batch_aborts_with_500_when_storage_is_unreachable() -> anyhow::Result<()> {
        let context =
            create_test_context_with(unreachable_namespaces().await, MockEmbeddingConfig::default())
                .await?;

        let response = context
            .server
            .post("/process_embeddings")
            .json(&json!({ "user_id": "u1" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.json::<Value>();
        assert_eq!(body["name"], "internal_server_error");
        assert_eq!(body["resource"], "files-embeddings");
        assert!(body["context"].as_str().is_some_and(|c| c.contains("files-embeddings")));
        assert!(body.get("result").is_none());
        assert_eq!(context.provider.stats().calls(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn single_aborts_with_500_when_storage_is_unreachable() -> anyhow::Result<()> {
        let context =
            create_test_context_with(unreachable_namespaces().await, MockEmbeddingConfig::default())
                .await?;

        let response = context
            .server
            .post("/process_single_embedding")
            .json(&json!({ "user_id": "u1", "blob_name": "a.json" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.json::<Value>();
        assert_eq!(body["name"], "internal_server_error");
        assert_eq!(body["resource"], "files-embeddings");
        assert_eq!(context.provider.stats().calls(), 0);
        Ok(())
    }
}
