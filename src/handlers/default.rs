//! Catch-all content handler
//!
//! Handles every hostname no specific handler claims. A bounded HEAD probe
//! decides whether a URL is an HTML page (fetched and text-extracted) or
//! some other document type (handled best-effort for text, declined
//! otherwise).
//!
//! The handler caches the last fetched page body so `extract` and
//! `discover_links` on the same URL cost one fetch. The cache holds exactly
//! one URL and is overwritten on the next; it is why handler instances are
//! never shared across concurrent tasks.

use crate::fetch::{fetch_text, probe_content_type};
use crate::handlers::{Extraction, Handler, HandlerResult, LinkSource};
use crate::summarize::Summarizer;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

struct PageCache {
    url: String,
    body: String,
}

pub struct DefaultHandler {
    client: Client,
    summarizer: Arc<dyn Summarizer>,
    probe_timeout: Duration,
    cache: Mutex<Option<PageCache>>,
}

impl DefaultHandler {
    pub fn new(client: Client, summarizer: Arc<dyn Summarizer>, probe_timeout: Duration) -> Self {
        Self {
            client,
            summarizer,
            probe_timeout,
            cache: Mutex::new(None),
        }
    }

    /// Returns the page body, fetching unless the cache already holds it
    async fn page_body(&self, url: &Url) -> HandlerResult<String> {
        {
            let cache = self.cache.lock().unwrap();
            if let Some(cached) = cache.as_ref() {
                if cached.url == url.as_str() {
                    return Ok(cached.body.clone());
                }
            }
        }

        let page = fetch_text(&self.client, url.as_str()).await?;

        let mut cache = self.cache.lock().unwrap();
        *cache = Some(PageCache {
            url: url.as_str().to_string(),
            body: page.body.clone(),
        });
        Ok(page.body)
    }

    async fn extract_webpage(&self, url: &Url) -> HandlerResult<Extraction> {
        let body = self.page_body(url).await?;
        let content = html_to_text(&body);

        let summary = self
            .summarizer
            .summarize(&format!(
                "Summarize the following webpage content:\n{}",
                content
            ))
            .await;

        Ok(Extraction {
            content: Some(content),
            summary,
            raw_source: Some(body),
            data: None,
        })
    }

    async fn extract_document(&self, url: &Url, content_type: &str) -> HandlerResult<Extraction> {
        // Only plain-text document types are worth pulling down
        if !content_type.starts_with("text/") {
            return Ok(Extraction::content_note(format!(
                "Document type not supported: {}",
                content_type
            )));
        }

        let page = fetch_text(&self.client, url.as_str()).await?;
        let content = collapse_whitespace(&page.body);
        let summary = self.summarizer.summarize(&content).await;

        Ok(Extraction {
            content: Some(content),
            summary,
            raw_source: Some(page.body),
            data: None,
        })
    }
}

#[async_trait]
impl Handler for DefaultHandler {
    fn name(&self) -> &str {
        "default"
    }

    /// The catch-all supports every hostname
    fn supports(&self, _hostname: &str) -> bool {
        true
    }

    async fn extract(&self, url: &Url) -> HandlerResult<Extraction> {
        let content_type =
            probe_content_type(&self.client, url.as_str(), self.probe_timeout).await;

        match content_type {
            None => Ok(Extraction::content_note("Could not reach webpage in time")),
            Some(ct) if ct.contains("text/html") => self.extract_webpage(url).await,
            Some(ct) => self.extract_document(url, &ct).await,
        }
    }

    fn as_link_source(&self) -> Option<&dyn LinkSource> {
        Some(self)
    }
}

#[async_trait]
impl LinkSource for DefaultHandler {
    async fn discover_links(&self, url: &Url) -> HandlerResult<Vec<String>> {
        let content_type =
            probe_content_type(&self.client, url.as_str(), self.probe_timeout).await;

        // Link discovery only makes sense for HTML pages
        let Some(ct) = content_type else {
            return Ok(Vec::new());
        };
        if !ct.contains("text/html") {
            return Ok(Vec::new());
        }

        let body = self.page_body(url).await?;
        Ok(extract_page_links(&body, url))
    }
}

/// Flattens an HTML document to whitespace-normalized text
fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text: Vec<&str> = document.root_element().text().collect();
    collapse_whitespace(&text.join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts followable links from a page
///
/// Hrefs are resolved against the page URL. Empty links, fragment
/// identifiers, and mailto links are dropped; document order is preserved
/// with duplicates removed.
fn extract_page_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            if href.is_empty() || href.contains('#') || href.starts_with("mailto:") {
                continue;
            }
            let Ok(resolved) = base_url.join(href) else {
                continue;
            };
            let resolved = resolved.to_string();
            if seen.insert(resolved.clone()) {
                links.push(resolved);
            }
        }
    }

    links
}
