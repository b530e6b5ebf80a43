//! Configuration module for Driftnet
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. The configuration object is built once at process start and passed
//! by reference to every component that needs it; nothing reads settings or
//! secrets from the environment after startup.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetchConfig, SinkConfig, SummarizerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
