//! Fan-out scheduler: parallel crawls over independent seeds
//!
//! Each seed gets its own spawned task with fully independent frontier
//! state and its own handler registry instance, so handler page caches are
//! never shared across concurrent crawls. A semaphore caps how many run at
//! once; the batch waits for all of them.
//!
//! Failure isolation is all-or-nothing per seed: a task that returns an
//! error (or panics) contributes no results at all — its partial output is
//! withheld and a failure record goes to the sink instead. Other tasks are
//! unaffected, and the caller never sees an error for a failed seed.

use crate::crawler::{run_task, PersistContext, TaskResults, TaskSpec};
use crate::handlers::{HandlerRegistry, RegistryError};
use crate::sink::store_best_effort;
use crate::DriftnetError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Builds a fresh registry for one task
///
/// Handler instances carry per-URL page caches, so every concurrent task
/// needs its own set.
pub type RegistryFactory =
    Arc<dyn Fn() -> Result<HandlerRegistry, RegistryError> + Send + Sync>;

/// One quarantined seed
#[derive(Debug, Clone)]
pub struct SeedFailure {
    pub seed: String,
    pub error: String,
}

/// Outcome of a batch crawl
///
/// A seed contributes to exactly one of the two fields: its task either
/// completed and had its results merged, or failed and was recorded here
/// (and in the sink's failure records).
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Merged per-URL results across all succeeding seeds
    pub results: TaskResults,

    /// Seeds whose task failed outright
    pub failures: Vec<SeedFailure>,
}

/// Crawls every seed concurrently and merges the outcomes
///
/// `max_concurrent` bounds how many seed tasks run at once; all seeds are
/// awaited before the report is returned. Result maps merge by URL key, so
/// two seeds reaching the same page overwrite one another harmlessly.
pub async fn run_batch(
    seeds: &[String],
    spec: &TaskSpec,
    registry_factory: RegistryFactory,
    persist: Option<PersistContext>,
    max_concurrent: usize,
) -> BatchReport {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let semaphore = semaphore.clone();
        let factory = registry_factory.clone();
        let persist = persist.clone();
        let task = spec.for_seed(seed.clone());

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|_| {
                DriftnetError::TaskAborted {
                    seed: task.seed.clone(),
                    reason: "scheduler shut down".to_string(),
                }
            })?;

            let registry = factory()?;
            run_task(&task, &registry, persist.as_ref()).await
        });

        handles.push((seed.clone(), handle));
    }

    let mut report = BatchReport::default();

    for (seed, handle) in handles {
        match handle.await {
            Ok(Ok(results)) => {
                tracing::info!("Seed {} completed with {} results", seed, results.len());
                report.results.extend(results);
            }
            Ok(Err(e)) => {
                quarantine_failure(&mut report, seed, e.to_string(), persist.as_ref()).await;
            }
            Err(join_error) => {
                let reason = if join_error.is_panic() {
                    "task panicked".to_string()
                } else {
                    join_error.to_string()
                };
                quarantine_failure(&mut report, seed, reason, persist.as_ref()).await;
            }
        }
    }

    report
}

/// Records a failed seed in the report and the sink
///
/// The failure artifact is keyed by a fresh UUID under the run's failures
/// sub-path; a sink write error here is swallowed like any other.
async fn quarantine_failure(
    report: &mut BatchReport,
    seed: String,
    error: String,
    persist: Option<&PersistContext>,
) {
    tracing::error!("Seed {} failed, withholding its results: {}", seed, error);

    if let Some(ctx) = persist {
        let name = format!("{}.json", Uuid::new_v4());
        let payload = serde_json::json!({
            "seed": seed,
            "error": error,
        });

        match serde_json::to_vec(&payload) {
            Ok(bytes) => {
                store_best_effort(
                    ctx.sink.as_ref(),
                    &ctx.container,
                    &ctx.failure_path(),
                    &name,
                    &bytes,
                )
                .await;
            }
            Err(e) => tracing::warn!("Failed to serialize failure record for {}: {}", seed, e),
        }
    }

    report.failures.push(SeedFailure { seed, error });
}
