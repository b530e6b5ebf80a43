//! Content handlers and the hostname dispatch registry
//!
//! A handler is a stateless-by-convention service object that knows how to
//! turn one site family's pages into structured [`Extraction`] records. The
//! registry owns the handlers and resolves each URL to exactly one of them
//! by normalized hostname; a distinguished catch-all handler picks up
//! everything no specific handler claims.
//!
//! Link discovery is an optional capability: a handler that can enumerate a
//! page's outbound links exposes it through [`Handler::as_link_source`], and
//! the crawler checks for the capability through that method alone.

mod default;
mod googledocs;
mod reddit;
mod registry;
mod wikipedia;
mod youtube;

pub use default::DefaultHandler;
pub use googledocs::GoogleDocsHandler;
pub use reddit::RedditHandler;
pub use registry::{standard_registry, HandlerRegistry, RegistryBuilder, RegistryError};
pub use wikipedia::WikipediaHandler;
pub use youtube::YoutubeHandler;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Structured result of extracting one URL
///
/// The shape is owned by handlers and opaque to the crawl engine; an
/// all-`None` record is what a failed page degrades to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Extracted page text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Summarized page text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Raw source the content was derived from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_source: Option<String>,

    /// Handler-specific structured data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Extraction {
    /// The record a failed or skipped page degrades to
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.summary.is_none()
            && self.raw_source.is_none()
            && self.data.is_none()
    }

    /// Record carrying only a summary
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }

    /// Record carrying only a content note (e.g. "document type not supported")
    pub fn content_note(note: impl Into<String>) -> Self {
        Self {
            content: Some(note.into()),
            ..Self::default()
        }
    }
}

/// Errors a handler can raise while extracting or discovering links
///
/// All of these are recoverable from the crawler's point of view: the
/// frontier loop downgrades them to an empty record and moves on.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from {url}: {message}")]
    BadResponse { url: String, message: String },

    #[error("Unsupported URL shape: {0}")]
    UnsupportedUrl(String),
}

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// A site-family content extractor
#[async_trait]
pub trait Handler: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Whether this handler claims the given normalized hostname
    fn supports(&self, hostname: &str) -> bool;

    /// Extracts structured content for one URL
    async fn extract(&self, url: &Url) -> HandlerResult<Extraction>;

    /// Optional link-discovery capability
    ///
    /// Handlers that can enumerate a page's outbound links return
    /// `Some(self)`; the rest inherit this default.
    fn as_link_source(&self) -> Option<&dyn LinkSource> {
        None
    }
}

/// Optional handler capability: enumerating a page's outbound links
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// Returns the outbound links of one URL, as raw strings
    async fn discover_links(&self, url: &Url) -> HandlerResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_extraction_serializes_to_empty_object() {
        let json = serde_json::to_string(&Extraction::empty()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_extraction_skips_absent_fields() {
        let record = Extraction::summary_only("hello");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"summary":"hello"}"#);
    }

    #[test]
    fn test_is_empty() {
        assert!(Extraction::empty().is_empty());
        assert!(!Extraction::content_note("x").is_empty());
    }
}
