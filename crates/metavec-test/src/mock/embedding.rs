//! Mock embedding provider for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use metavec_core::emb::{EmbeddingProvider, EmbeddingRequest, EmbeddingService, EmbeddingVector};
use metavec_core::{Error, ErrorKind, Result, ServiceHealth};
use serde::{Deserialize, Serialize};

/// Configuration for the mock embedding provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockEmbeddingConfig {
    /// Length of every produced vector.
    pub dimensions: usize,
    /// Inputs containing this substring fail with a rate-limit error.
    pub fail_on: Option<String>,
    /// Artificial delay before every answer.
    pub latency: Option<Duration>,
    /// Reported by the health check.
    pub healthy: bool,
}

impl Default for MockEmbeddingConfig {
    fn default() -> Self {
        Self {
            dimensions: 8,
            fail_on: None,
            latency: None,
            healthy: true,
        }
    }
}

impl MockEmbeddingConfig {
    /// Fails every input containing `needle`.
    pub fn with_failure_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Delays every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the health check report the provider as unhealthy.
    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }
}

/// Call counters shared between a mock provider and its clones.
#[derive(Debug, Default)]
pub struct MockEmbeddingStats {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockEmbeddingStats {
    /// Number of `embed` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of `embed` calls observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Mock embedding provider for testing.
///
/// Vectors are a pure function of the input text, so the same record always
/// produces the same output.
#[derive(Clone, Default, Debug)]
pub struct MockEmbeddingProvider {
    config: MockEmbeddingConfig,
    stats: Arc<MockEmbeddingStats>,
}

impl MockEmbeddingProvider {
    /// Creates a new mock embedding provider with the given configuration.
    pub fn new(config: MockEmbeddingConfig) -> Self {
        Self {
            config,
            stats: Arc::default(),
        }
    }

    /// Returns the shared call counters.
    pub fn stats(&self) -> Arc<MockEmbeddingStats> {
        Arc::clone(&self.stats)
    }

    /// Wraps a clone of this provider into a service bound to `model`.
    pub fn service(&self, model: &str) -> EmbeddingService {
        EmbeddingService::new(self.clone(), model)
    }

    /// Computes the vector the mock returns for `text`.
    pub fn vector_for(&self, text: &str) -> EmbeddingVector {
        let seed = text
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
                (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            });

        let components = (0..self.config.dimensions as u64)
            .map(|i| {
                let mixed = seed.rotate_left((i * 7 % 64) as u32) ^ i.wrapping_mul(0x9e37_79b9);
                (mixed % 10_000) as f64 / 10_000.0
            })
            .collect();

        EmbeddingVector::new(components)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingVector> {
        self.stats.enter();
        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }
        self.stats.exit();

        match self.config.fail_on {
            Some(ref needle) if request.input.contains(needle.as_str()) => {
                Err(Error::new(ErrorKind::RateLimited)
                    .with_message(format!("mock rejected input containing '{needle}'")))
            }
            _ => Ok(self.vector_for(&request.input)),
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        if self.config.healthy {
            Ok(ServiceHealth::healthy())
        } else {
            Ok(ServiceHealth::unhealthy("mock configured as unhealthy"))
        }
    }
}
