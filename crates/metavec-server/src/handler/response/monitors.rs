//! Monitor response types.

use jiff::Timestamp;
use metavec_core::ServiceStatus;
use serde::{Deserialize, Serialize};

/// System monitoring status response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorStatusResponse {
    /// `true` when every backing service is operational.
    pub is_healthy: bool,
    /// Status of the object storage backend.
    pub storage: ServiceStatus,
    /// Status of the embedding provider.
    pub embeddings: ServiceStatus,
    /// Timestamp when this status was generated.
    pub updated_at: Timestamp,
}
