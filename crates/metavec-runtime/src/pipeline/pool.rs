//! Bounded fan-out of item jobs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};

use super::TRACING_TARGET;
use super::outcome::ItemOutcome;
use crate::error::ItemError;

/// Runs item jobs concurrently, never more than `limit` at a time.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    limit: usize,
}

impl WorkerPool {
    /// Creates a pool with the given concurrency limit (at least 1).
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    /// Returns the concurrency limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `job` once per identifier and returns one outcome per identifier.
    ///
    /// A new job starts as soon as a running one finishes. Outcomes are
    /// returned in completion order. A job whose task panics yields a
    /// worker failure for its identifier.
    pub async fn run_all<F, Fut>(&self, identifiers: Vec<String>, job: F) -> Vec<ItemOutcome>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = ItemOutcome> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<Id, String> = HashMap::with_capacity(identifiers.len());
        let mut outcomes = Vec::with_capacity(identifiers.len());

        for identifier in identifiers {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    outcomes.push(ItemOutcome::failure(identifier, ItemError::worker(err)));
                    continue;
                }
            };

            let future = job(identifier.clone());
            let handle = tasks.spawn(async move {
                // Hold permit until job completes
                let _permit = permit;
                future.await
            });
            pending.insert(handle.id(), identifier);

            while let Some(joined) = tasks.try_join_next_with_id() {
                outcomes.extend(Self::collect(joined, &mut pending));
            }
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            outcomes.extend(Self::collect(joined, &mut pending));
        }

        outcomes
    }

    fn collect(
        joined: Result<(Id, ItemOutcome), JoinError>,
        pending: &mut HashMap<Id, String>,
    ) -> Option<ItemOutcome> {
        match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                Some(outcome)
            }
            Err(err) => {
                let identifier = pending.remove(&err.id())?;
                let reason = if err.is_panic() {
                    "job panicked"
                } else {
                    "job was cancelled"
                };

                tracing::error!(
                    target: TRACING_TARGET,
                    blob = %identifier,
                    error = %err,
                    "Item job ended without an outcome"
                );

                Some(ItemOutcome::failure(identifier, ItemError::worker(reason)))
            }
        }
    }
}
