//! Crawl orchestration engine
//!
//! This module contains the two layers of crawl control flow:
//! - the frontier crawler: one bounded breadth-first traversal per seed
//! - the fan-out scheduler: many independent seed crawls run concurrently,
//!   with failures quarantined so no seed can poison the batch
//!
//! Everything else in the crate is either a content handler dispatched from
//! here or plumbing these layers call into.

mod fanout;
mod frontier;

pub use fanout::{run_batch, BatchReport, RegistryFactory, SeedFailure};
pub use frontier::{run_task, FrontierCrawler, TaskResults};

use crate::handlers::HandlerRegistry;
use crate::sink::ResultSink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Traversal mode for a crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrawlMode {
    /// Process exactly the seed URL, no traversal
    None,
    /// Bounded breadth-first traversal from the seed
    Bfs,
}

/// One crawl task: a seed plus its traversal parameters
#[derive(Debug, Clone)]
pub struct CrawlTask {
    /// The starting URL, kept as the literal request string
    pub seed: String,

    pub mode: CrawlMode,

    /// Restrict traversal to URLs sharing the seed's normalized hostname
    pub confine_to_seed_domain: bool,

    /// Upper bound on processed URLs for this task
    pub max_results: usize,
}

/// Per-seed configuration shared across a batch
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub mode: CrawlMode,
    pub confine_to_seed_domain: bool,
    pub max_results: usize,
}

impl TaskSpec {
    /// Instantiates the spec for one seed
    pub fn for_seed(&self, seed: impl Into<String>) -> CrawlTask {
        CrawlTask {
            seed: seed.into(),
            mode: self.mode,
            confine_to_seed_domain: self.confine_to_seed_domain,
            max_results: self.max_results,
        }
    }
}

/// Where and under what run a crawl persists its artifacts
#[derive(Clone)]
pub struct PersistContext {
    pub sink: Arc<dyn ResultSink>,
    pub container: String,
    pub run_id: String,
}

impl PersistContext {
    /// Sub-path for per-page extraction records
    pub fn success_path(&self) -> String {
        format!("{}/successes", self.run_id)
    }

    /// Sub-path for per-seed failure records
    pub fn failure_path(&self) -> String {
        format!("{}/failures", self.run_id)
    }
}

/// Mints a run identifier for one incoming batch
///
/// Timestamp-derived so artifacts sort chronologically in the sink.
pub fn new_run_id() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d_%H:%M:%S%.6f")
        .to_string()
}

/// Link-discovery probe: one handler, one URL, no frontier
///
/// Debugging entry point that resolves the URL's handler and returns its raw
/// link discovery output. Handlers without the capability yield an empty
/// list.
pub async fn probe_links(url: &str, registry: &HandlerRegistry) -> crate::Result<Vec<String>> {
    let parsed = url::Url::parse(url)?;
    let handler = registry.resolve(&parsed);

    match handler.as_link_source() {
        Some(source) => Ok(source.discover_links(&parsed).await?),
        None => Ok(Vec::new()),
    }
}
