//! Driftnet main entry point
//!
//! Command-line interface for running handler-dispatched crawls over one or
//! more seed URLs.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use driftnet::config::load_config_with_hash;
use driftnet::crawler::{
    new_run_id, probe_links, run_batch, CrawlMode, PersistContext, RegistryFactory, TaskSpec,
};
use driftnet::fetch::build_http_client;
use driftnet::handlers::standard_registry;
use driftnet::sink::FsSink;
use driftnet::summarize::build_summarizer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Driftnet: a pluggable, handler-dispatched web crawler
///
/// Driftnet runs one bounded breadth-first crawl per seed URL, routing each
/// page to a content handler chosen by hostname, and prints the merged
/// extraction results as JSON.
#[derive(Parser, Debug)]
#[command(name = "driftnet")]
#[command(version)]
#[command(about = "A pluggable, handler-dispatched web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Seed URL to crawl (repeatable)
    #[arg(long = "seed", value_name = "URL", required = true)]
    seeds: Vec<String>,

    /// Traversal mode
    #[arg(long, value_enum, default_value = "bfs")]
    mode: ModeArg,

    /// Only follow links on the seed's domain
    #[arg(long)]
    confine_domain: bool,

    /// Maximum processed URLs per seed (defaults from config)
    #[arg(long, value_name = "N")]
    max_results: Option<usize>,

    /// Persist per-page results and failure records to the sink
    #[arg(long)]
    persist: bool,

    /// Print each seed's direct link-discovery output and exit
    #[arg(long, conflicts_with_all = ["persist", "confine_domain"])]
    probe_links: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    None,
    Bfs,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::None => CrawlMode::None,
            ModeArg::Bfs => CrawlMode::Bfs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) =
        load_config_with_hash(&cli.config).context("failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let client = build_http_client(&config.fetch).context("failed to build HTTP client")?;
    let summarizer = build_summarizer(client.clone(), &config.summarizer);

    // One registry per task: handler instances hold page caches that must
    // not be shared between concurrently running crawls
    let registry_factory: RegistryFactory = {
        let config = Arc::new(config.clone());
        let client = client.clone();
        let summarizer = summarizer.clone();
        Arc::new(move || standard_registry(&config, client.clone(), summarizer.clone()))
    };

    if cli.probe_links {
        return handle_probe_links(&cli, registry_factory()).await;
    }

    let spec = TaskSpec {
        mode: cli.mode.into(),
        confine_to_seed_domain: cli.confine_domain,
        max_results: cli
            .max_results
            .unwrap_or(config.crawler.default_max_results as usize),
    };

    let persist = if cli.persist {
        let ctx = PersistContext {
            sink: Arc::new(FsSink::new(&config.sink.root_path)),
            container: config.sink.container.clone(),
            run_id: new_run_id(),
        };
        tracing::info!("Persisting artifacts under run {}", ctx.run_id);
        Some(ctx)
    } else {
        None
    };

    tracing::info!(
        "Crawling {} seed(s), mode {:?}, max {} results per seed",
        cli.seeds.len(),
        spec.mode,
        spec.max_results
    );

    let report = run_batch(
        &cli.seeds,
        &spec,
        registry_factory,
        persist,
        config.crawler.max_concurrent_tasks as usize,
    )
    .await;

    if !report.failures.is_empty() {
        tracing::warn!(
            "{} of {} seeds failed; details in the failure sink",
            report.failures.len(),
            cli.seeds.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&report.results)?);

    Ok(())
}

/// Handles --probe-links: one registry resolution per seed, no crawling
async fn handle_probe_links(
    cli: &Cli,
    registry: Result<driftnet::handlers::HandlerRegistry, driftnet::handlers::RegistryError>,
) -> anyhow::Result<()> {
    let registry = registry.context("failed to build handler registry")?;

    let mut output = serde_json::Map::new();
    for seed in &cli.seeds {
        match probe_links(seed, &registry).await {
            Ok(links) => {
                output.insert(seed.clone(), serde_json::json!({ "links": links }));
            }
            Err(e) => {
                tracing::error!("Link probe failed for {}: {}", seed, e);
                output.insert(seed.clone(), serde_json::json!({ "links": [] }));
            }
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(output))?
    );
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("driftnet=info,warn"),
            1 => EnvFilter::new("driftnet=debug,info"),
            2 => EnvFilter::new("driftnet=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
