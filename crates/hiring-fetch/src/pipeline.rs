//! Fetch pipeline: root item, then concurrent child fan-out.
//!
//! The root fetch is sequential and fatal on failure. Children are
//! fetched as independent tasks bounded by a semaphore, each under its
//! own deadline. A child that fails, times out or lacks a body or time
//! is counted as skipped and never fails the batch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use hiring_types::{Item, Posting};

use crate::client::ItemClient;
use crate::error::FetchError;
use crate::normalize::normalize;

/// Configuration for the fetch pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum child fetches in flight at once
    pub max_concurrency: usize,
    /// Deadline for each child fetch
    pub fetch_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 32,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl PipelineConfig {
    /// Set the fan-out bound. Zero is treated as one.
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    /// Set the per-child deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

/// Output of one pipeline run. Posting order is not meaningful.
#[derive(Debug, Default)]
pub struct FetchResult {
    /// Accepted, normalized postings
    pub postings: Vec<Posting>,
    /// Children that failed or lacked required fields
    pub skipped: usize,
}

impl FetchResult {
    /// Number of children considered (accepted + skipped).
    pub fn total(&self) -> usize {
        self.postings.len() + self.skipped
    }
}

/// Per-child result before filtering.
#[derive(Debug)]
enum ChildOutcome {
    Accepted(Posting),
    Incomplete,
    Failed(FetchError),
}

/// Walks one root item and its children.
pub struct FetchPipeline {
    client: Arc<dyn ItemClient>,
    config: PipelineConfig,
}

impl FetchPipeline {
    /// Create a pipeline over an injected client.
    pub fn new(client: Arc<dyn ItemClient>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the root and all of its children.
    ///
    /// Fails only when the root cannot be fetched or has no `kids`.
    pub async fn fetch_postings(&self, root_id: u64) -> Result<FetchResult, FetchError> {
        info!(root_id, "Fetching root item");
        let root = self.client.fetch_item(root_id).await?;
        let kids = root.kids.ok_or(FetchError::MissingKids(root_id))?;

        info!(
            root_id,
            children = kids.len(),
            max_concurrency = self.config.max_concurrency,
            "Fetching child items"
        );

        let outcomes = self.fetch_children(&kids).await;

        let mut result = FetchResult::default();
        for (kid, outcome) in kids.iter().zip(outcomes) {
            match outcome {
                ChildOutcome::Accepted(posting) => result.postings.push(posting),
                ChildOutcome::Incomplete => {
                    debug!(id = kid, "Skipping item without text or time");
                    result.skipped += 1;
                }
                ChildOutcome::Failed(e) => {
                    debug!(id = kid, error = %e, "Skipping item that failed to fetch");
                    result.skipped += 1;
                }
            }
        }

        info!(
            root_id,
            accepted = result.postings.len(),
            skipped = result.skipped,
            "Fetch complete"
        );

        Ok(result)
    }

    /// Fan out one task per child; results are addressed by position in `kids`.
    ///
    /// Tasks live in a `JoinSet`, so dropping this future aborts any still running.
    async fn fetch_children(&self, kids: &[u64]) -> Vec<ChildOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (slot, &kid) in kids.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let semaphore = Arc::clone(&semaphore);
            let deadline = self.config.fetch_timeout;

            tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => fetch_child(client.as_ref(), kid, deadline).await,
                    Err(_) => ChildOutcome::Failed(FetchError::Decode(
                        "fetch semaphore closed".to_string(),
                    )),
                };
                (slot, outcome)
            });
        }

        let mut slots: Vec<Option<ChildOutcome>> = kids.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, outcome)) => slots[slot] = Some(outcome),
                Err(e) => warn!(error = %e, "Child fetch task did not complete"),
            }
        }

        // A slot left empty belongs to a task that panicked or was cancelled.
        kids.iter()
            .zip(slots)
            .map(|(&kid, slot)| {
                slot.unwrap_or(ChildOutcome::Failed(FetchError::Decode(format!(
                    "fetch task for item {} aborted",
                    kid
                ))))
            })
            .collect()
    }
}

async fn fetch_child(client: &dyn ItemClient, id: u64, deadline: Duration) -> ChildOutcome {
    let item: Item = match tokio::time::timeout(deadline, client.fetch_item(id)).await {
        Ok(Ok(item)) => item,
        Ok(Err(e)) => return ChildOutcome::Failed(e),
        Err(_) => return ChildOutcome::Failed(FetchError::Timeout(id)),
    };

    match item.into_posting(id, normalize) {
        Some(posting) => ChildOutcome::Accepted(posting),
        None => ChildOutcome::Incomplete,
    }
}
