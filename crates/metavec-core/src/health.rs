//! Health of the storage backend and the embedding provider, as rendered by
//! the health endpoint.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Whether a collaborator can currently serve requests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Operational,
    Unavailable,
}

impl ServiceStatus {
    pub fn is_operational(self) -> bool {
        self == Self::Operational
    }
}

/// One probe of a collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: ServiceStatus,
    /// Failure reason of an unavailable collaborator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// How long the probe took, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<Duration>,
    pub checked_at: Timestamp,
}

impl ServiceHealth {
    fn probe(status: ServiceStatus, reason: Option<String>) -> Self {
        Self {
            status,
            reason,
            latency: None,
            checked_at: Timestamp::now(),
        }
    }

    pub fn healthy() -> Self {
        Self::probe(ServiceStatus::Operational, None)
    }

    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self::probe(ServiceStatus::Unavailable, Some(reason.into()))
    }

    /// Records how long the probe took.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn is_operational(&self) -> bool {
        self.status.is_operational()
    }
}
