//! System health monitoring handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use jiff::Timestamp;
use metavec_core::ServiceStatus;
use metavec_core::emb::EmbeddingService;
use metavec_opendal::StorageBackend;

use super::response::MonitorStatusResponse;
use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "metavec_server::handler::monitors";

/// Probes the storage backend and the embedding provider.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(storage): State<StorageBackend>,
    State(embeddings): State<EmbeddingService>,
) -> (StatusCode, Json<MonitorStatusResponse>) {
    let (storage_health, embeddings_health) =
        futures::join!(storage.health_check(), embeddings.health_check());

    let embeddings_status = match embeddings_health {
        Ok(health) => health.status,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Embedding provider health check failed"
            );
            ServiceStatus::Unavailable
        }
    };

    let is_healthy = storage_health.is_operational() && embeddings_status.is_operational();
    let response = MonitorStatusResponse {
        is_healthy,
        storage: storage_health.status,
        embeddings: embeddings_status,
        updated_at: Timestamp::now(),
    };

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        is_healthy = is_healthy,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
