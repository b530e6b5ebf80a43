//! Reddit content handler
//!
//! Subreddit listings are read through the public JSON feed and summarized
//! from their post titles. Post and user pages are recognized but yield
//! empty records.

use crate::handlers::{Extraction, Handler, HandlerResult};
use crate::summarize::Summarizer;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

const SUPPORTED_HOSTS: &[&str] = &["reddit.com", "old.reddit.com"];

pub struct RedditHandler {
    client: Client,
    summarizer: Arc<dyn Summarizer>,
}

impl RedditHandler {
    pub fn new(client: Client, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { client, summarizer }
    }

    async fn extract_subreddit(&self, url: &Url) -> HandlerResult<Extraction> {
        let listing_url = format!(
            "https://www.reddit.com{}.json",
            url.path().trim_end_matches('/')
        );

        let response = self.client.get(&listing_url).send().await?;
        if !response.status().is_success() {
            return Ok(Extraction::empty());
        }

        let body: Value = response.json().await?;
        let titles = post_titles(&body);
        if titles.is_empty() {
            return Ok(Extraction::empty());
        }

        let content = titles
            .iter()
            .enumerate()
            .map(|(i, title)| format!("article_{}: {}", i + 1, title))
            .collect::<Vec<_>>()
            .join("\n");

        let summary = self
            .summarizer
            .summarize(&format!("{}\n\nSummarize the previous articles", content))
            .await;

        Ok(Extraction {
            content: Some(content.clone()),
            summary,
            raw_source: Some(content),
            data: None,
        })
    }
}

#[async_trait]
impl Handler for RedditHandler {
    fn name(&self) -> &str {
        "reddit"
    }

    fn supports(&self, hostname: &str) -> bool {
        SUPPORTED_HOSTS.contains(&hostname)
    }

    async fn extract(&self, url: &Url) -> HandlerResult<Extraction> {
        let path = url.path();

        if path.contains("/r/") && !path.contains("/comments/") {
            self.extract_subreddit(url).await
        } else {
            // Post and user pages are not extracted yet
            Ok(Extraction::empty())
        }
    }
}

/// Post titles from a subreddit JSON listing
fn post_titles(body: &Value) -> Vec<String> {
    let Some(children) = body
        .get("data")
        .and_then(|d| d.get("children"))
        .and_then(|c| c.as_array())
    else {
        return Vec::new();
    };

    children
        .iter()
        .filter_map(|child| child.get("data")?.get("title")?.as_str())
        .map(|s| s.to_string())
        .collect()
}
