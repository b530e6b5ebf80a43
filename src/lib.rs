//! Driftnet: a pluggable, handler-dispatched web crawler
//!
//! This crate implements a bounded breadth-first crawler. Each URL is routed
//! to a site-specific content handler by hostname, and many independent seed
//! crawls run in parallel with per-task failure isolation.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod handlers;
pub mod sink;
pub mod summarize;
pub mod url;

use thiserror::Error;

/// Main error type for Driftnet operations
#[derive(Debug, Error)]
pub enum DriftnetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Handler error: {0}")]
    Handler(#[from] handlers::HandlerError),

    #[error("Registry error: {0}")]
    Registry(#[from] handlers::RegistryError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl task for {seed} aborted: {reason}")]
    TaskAborted { seed: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Driftnet operations
pub type Result<T> = std::result::Result<T, DriftnetError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    new_run_id, probe_links, run_batch, run_task, BatchReport, CrawlMode, CrawlTask,
    PersistContext, TaskSpec,
};
pub use handlers::{Extraction, Handler, HandlerRegistry, LinkSource, RegistryBuilder};
pub use url::{is_crawlable, normalized_hostname};
