//! Frontier crawler: one bounded breadth-first traversal
//!
//! A task moves READY -> RUNNING -> DONE. RUNNING loops while the frontier
//! queue is non-empty and fewer than `max_results` URLs have been processed;
//! either condition failing ends the task, and its results map is final.
//!
//! Two properties carry the correctness of the traversal:
//! - URLs are popped from the FRONT of the queue. Strict FIFO is what makes
//!   the walk breadth-first, so the result set under `max_results` is always
//!   a level-order prefix of the link graph.
//! - Extraction errors are caught per URL and downgraded to an empty record.
//!   One malformed page costs one empty entry, never the task.

use crate::crawler::{CrawlMode, CrawlTask, PersistContext};
use crate::handlers::{Extraction, HandlerRegistry};
use crate::sink::store_best_effort;
use crate::url::{is_crawlable, normalized_hostname, parse_candidate};
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;
use uuid::Uuid;

/// Per-task results: literal URL string to extraction record
pub type TaskResults = HashMap<String, Extraction>;

/// Runs one crawl task to completion
pub async fn run_task(
    task: &CrawlTask,
    registry: &HandlerRegistry,
    persist: Option<&PersistContext>,
) -> crate::Result<TaskResults> {
    FrontierCrawler::new(task, registry, persist).run().await
}

/// State for one traversal
///
/// `discovered` only grows and holds literal URL strings: a URL enqueued
/// once is never enqueued again within the task, and no canonicalization is
/// applied beyond what the handler emitted.
pub struct FrontierCrawler<'a> {
    task: &'a CrawlTask,
    registry: &'a HandlerRegistry,
    persist: Option<&'a PersistContext>,
    queue: VecDeque<String>,
    discovered: HashSet<String>,
    results: TaskResults,
}

impl<'a> FrontierCrawler<'a> {
    pub fn new(
        task: &'a CrawlTask,
        registry: &'a HandlerRegistry,
        persist: Option<&'a PersistContext>,
    ) -> Self {
        Self {
            task,
            registry,
            persist,
            queue: VecDeque::new(),
            discovered: HashSet::new(),
            results: TaskResults::new(),
        }
    }

    /// Runs the task until its natural termination
    pub async fn run(mut self) -> crate::Result<TaskResults> {
        tracing::debug!(
            "Starting {:?} task for seed {} (max_results={})",
            self.task.mode,
            self.task.seed,
            self.task.max_results
        );

        match self.task.mode {
            CrawlMode::None => self.run_single().await?,
            CrawlMode::Bfs => self.run_bfs().await?,
        }

        tracing::debug!(
            "Task for seed {} done: {} results, {} discovered",
            self.task.seed,
            self.results.len(),
            self.discovered.len()
        );

        Ok(self.results)
    }

    /// Mode NONE: the seed is processed exactly once, links are never followed
    async fn run_single(&mut self) -> crate::Result<()> {
        let seed = self.task.seed.clone();

        let Some(url) = parse_valid(&seed) else {
            return Ok(());
        };

        let extraction = self.process_url(&url).await;
        self.record(seed, &url, extraction).await;
        Ok(())
    }

    /// Mode BFS: level-order traversal bounded by `max_results`
    async fn run_bfs(&mut self) -> crate::Result<()> {
        let seed = self.task.seed.clone();
        let start_domain = Url::parse(&seed).ok().and_then(|u| normalized_hostname(&u));

        self.queue.push_back(seed.clone());
        self.discovered.insert(seed);

        while self.results.len() < self.task.max_results {
            let Some(raw) = self.queue.pop_front() else {
                break;
            };

            // Invalid URLs leave the frontier silently
            let Some(url) = parse_valid(&raw) else {
                tracing::debug!("Dropping invalid frontier URL: {}", raw);
                continue;
            };

            let extraction = self.process_url(&url).await;
            self.record(raw, &url, extraction).await;

            self.follow_links(&url, start_domain.as_deref()).await;
        }

        Ok(())
    }

    /// Extracts one URL, downgrading any handler error to an empty record
    async fn process_url(&self, url: &Url) -> Extraction {
        let handler = self.registry.resolve(url);
        tracing::debug!("Processing {} with handler '{}'", url, handler.name());

        match handler.extract(url).await {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::warn!("Extraction failed for {}: {}", url, e);
                Extraction::empty()
            }
        }
    }

    /// Records a processed URL, persisting the pair when requested
    async fn record(&mut self, raw: String, url: &Url, extraction: Extraction) {
        if let Some(ctx) = self.persist {
            persist_result(ctx, url, &raw, &extraction).await;
        }
        self.results.insert(raw, extraction);
    }

    /// Feeds a page's outbound links into the frontier
    ///
    /// Candidates are dropped when they have no parseable hostname, fall
    /// outside the seed domain under confinement, or were already
    /// discovered. Discovery errors count as page-level failures: logged,
    /// traversal continues.
    async fn follow_links(&mut self, url: &Url, start_domain: Option<&str>) {
        let handler = self.registry.resolve(url);
        let Some(source) = handler.as_link_source() else {
            return;
        };

        let links = match source.discover_links(url).await {
            Ok(links) => links,
            Err(e) => {
                tracing::warn!("Link discovery failed for {}: {}", url, e);
                return;
            }
        };

        for candidate in links {
            let Some(parsed) = parse_candidate(&candidate) else {
                continue;
            };

            if self.task.confine_to_seed_domain
                && normalized_hostname(&parsed).as_deref() != start_domain
            {
                continue;
            }

            // insert returns false when already discovered
            if self.discovered.insert(candidate.clone()) {
                self.queue.push_back(candidate);
            }
        }
    }
}

/// Parses a frontier entry, returning None unless it is a fetchable URL
fn parse_valid(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    if is_crawlable(&url) {
        Some(url)
    } else {
        None
    }
}

/// Persists one (url, extraction) pair as a success artifact
async fn persist_result(ctx: &PersistContext, url: &Url, raw: &str, extraction: &Extraction) {
    let host = normalized_hostname(url).unwrap_or_else(|| "unknown".to_string());
    let name = format!("{}_{}.json", host, Uuid::new_v4());

    let payload = match serde_json::to_vec(&serde_json::json!({ raw: extraction })) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Failed to serialize result for {}: {}", raw, e);
            return;
        }
    };

    store_best_effort(
        ctx.sink.as_ref(),
        &ctx.container,
        &ctx.success_path(),
        &name,
        &payload,
    )
    .await;
}
