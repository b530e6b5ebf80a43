//! Hostname-to-handler resolution
//!
//! Handlers are registered in a significant order: `resolve` scans specific
//! handlers first-registered-first and falls back to the distinguished
//! default. The default is stored apart from the scan list, so no
//! registration order can ever shadow a specific handler with the catch-all.

use crate::config::{Config, FetchConfig};
use crate::handlers::{
    DefaultHandler, GoogleDocsHandler, Handler, RedditHandler, WikipediaHandler, YoutubeHandler,
};
use crate::summarize::Summarizer;
use crate::url::normalized_hostname;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while assembling a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("No default handler registered")]
    MissingDefault,
}

/// Immutable handler registry
///
/// Built once per crawl task and read-only afterwards. Handlers keep
/// per-instance page caches, so a registry (and its handler instances) must
/// not be shared between concurrently running tasks.
pub struct HandlerRegistry {
    specific: Vec<Arc<dyn Handler>>,
    fallback: Arc<dyn Handler>,
}

impl HandlerRegistry {
    /// Resolves a URL to its handler
    ///
    /// Scans specific handlers in registration order and returns the first
    /// whose supported set contains the URL's normalized hostname, falling
    /// back to the default handler. Never fails: URLs without a hostname go
    /// to the default too.
    pub fn resolve(&self, url: &Url) -> Arc<dyn Handler> {
        if let Some(hostname) = normalized_hostname(url) {
            for handler in &self.specific {
                if handler.supports(&hostname) {
                    tracing::trace!("Resolved {} to handler '{}'", url, handler.name());
                    return handler.clone();
                }
            }
        }
        self.fallback.clone()
    }
}

/// Builder enforcing the default-last resolution rule at construction time
#[derive(Default)]
pub struct RegistryBuilder {
    specific: Vec<Arc<dyn Handler>>,
    fallback: Option<Arc<dyn Handler>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a specific handler; registration order is resolution order
    pub fn register(mut self, handler: Arc<dyn Handler>) -> Self {
        self.specific.push(handler);
        self
    }

    /// Sets the catch-all handler consulted only after every specific one
    pub fn default_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// Builds the registry, failing fast when no default was provided
    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        let fallback = self.fallback.ok_or(RegistryError::MissingDefault)?;
        Ok(HandlerRegistry {
            specific: self.specific,
            fallback,
        })
    }
}

/// Assembles the standard handler set
///
/// This is the explicit registration list: every available handler and its
/// position in the scan order lives here, in code, rather than in any
/// runtime discovery scheme.
pub fn standard_registry(
    config: &Config,
    client: Client,
    summarizer: Arc<dyn Summarizer>,
) -> Result<HandlerRegistry, RegistryError> {
    let fetch = &config.fetch;

    RegistryBuilder::new()
        .register(Arc::new(RedditHandler::new(
            client.clone(),
            summarizer.clone(),
        )))
        .register(Arc::new(YoutubeHandler::new(
            client.clone(),
            summarizer.clone(),
        )))
        .register(Arc::new(WikipediaHandler::new(client.clone())))
        .register(Arc::new(GoogleDocsHandler::new(client.clone())))
        .default_handler(Arc::new(DefaultHandler::new(
            client,
            summarizer,
            probe_timeout(fetch),
        )))
        .build()
}

fn probe_timeout(fetch: &FetchConfig) -> Duration {
    Duration::from_secs(fetch.probe_timeout_secs)
}
