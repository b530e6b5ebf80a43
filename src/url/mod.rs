//! URL handling module for Driftnet
//!
//! This module provides hostname normalization (the key used for handler
//! dispatch and domain confinement), scheme validation, and query parameter
//! parsing.
//!
//! Deliberately absent: full URL canonicalization. Two URLs are the same
//! crawl node only when their literal strings match, so `http://x` and
//! `https://x` stay distinct.

mod host;
mod params;

pub use host::{is_crawlable, normalized_hostname, parse_candidate};
pub use params::query_params;
