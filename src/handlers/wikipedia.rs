//! Wikipedia content handler
//!
//! Uses the REST summary endpoint for content and the MediaWiki links API
//! for link discovery, so no page HTML is ever parsed.

use crate::handlers::{Extraction, Handler, HandlerResult, LinkSource};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

const SUPPORTED_HOSTS: &[&str] = &["wikipedia.com", "en.wikipedia.org", "wikipedia.org"];

const SUMMARY_API: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";
const LINKS_API: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikipediaHandler {
    client: Client,
}

impl WikipediaHandler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Handler for WikipediaHandler {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn supports(&self, hostname: &str) -> bool {
        SUPPORTED_HOSTS.contains(&hostname)
    }

    async fn extract(&self, url: &Url) -> HandlerResult<Extraction> {
        let Some(title) = page_title(url) else {
            return Ok(Extraction::summary_only("No summary found."));
        };

        let request_url = format!("{}/{}", SUMMARY_API, title);
        let response = self.client.get(&request_url).send().await?;

        if !response.status().is_success() {
            return Ok(Extraction::summary_only("No summary found."));
        }

        let body: Value = response.json().await?;
        let summary = body
            .get("extract")
            .and_then(|v| v.as_str())
            .unwrap_or("No summary found.");

        Ok(Extraction::summary_only(summary))
    }

    fn as_link_source(&self) -> Option<&dyn LinkSource> {
        Some(self)
    }
}

#[async_trait]
impl LinkSource for WikipediaHandler {
    async fn discover_links(&self, url: &Url) -> HandlerResult<Vec<String>> {
        let Some(title) = page_title(url) else {
            return Ok(Vec::new());
        };

        let response = self
            .client
            .get(LINKS_API)
            .query(&[
                ("action", "query"),
                ("titles", title.as_str()),
                ("prop", "links"),
                ("pllimit", "max"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: Value = response.json().await?;
        Ok(article_links(&body))
    }
}

/// Article title from the last path segment
fn page_title(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    Some(segment.to_string())
}

/// Linked article titles from a MediaWiki links query, as article URLs
fn article_links(body: &Value) -> Vec<String> {
    let Some(pages) = body
        .get("query")
        .and_then(|q| q.get("pages"))
        .and_then(|p| p.as_object())
    else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for page in pages.values() {
        let Some(page_links) = page.get("links").and_then(|l| l.as_array()) else {
            continue;
        };
        for link in page_links {
            if let Some(title) = link.get("title").and_then(|t| t.as_str()) {
                links.push(article_url(title));
            }
        }
    }
    links
}

fn article_url(title: &str) -> String {
    format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_"))
}
