//! Text summarization service
//!
//! Handlers hand page text to a [`Summarizer`] to produce the `summary`
//! field of their extraction records. Summarization is strictly best-effort:
//! a failed or disabled summarizer yields `None` and never fails the
//! extraction that asked for it.

use crate::config::SummarizerConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;

/// Best-effort text summarization
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarizes the given prompt, or returns `None` when unavailable
    async fn summarize(&self, prompt: &str) -> Option<String>;
}

/// Summarizer backed by an HTTP completion endpoint
pub struct CompletionSummarizer {
    client: Client,
    config: SummarizerConfig,
}

impl CompletionSummarizer {
    pub fn new(client: Client, config: SummarizerConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Summarizer for CompletionSummarizer {
    async fn summarize(&self, prompt: &str) -> Option<String> {
        let api_key = self.config.api_key.as_ref()?;

        let request = json!({
            "model": self.config.model,
            "prompt": prompt,
            "temperature": 0.0,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Summarizer request failed: {}", e);
                return None;
            }
        };

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Summarizer returned unparsable body: {}", e);
                return None;
            }
        };

        extract_completion_text(&body)
    }
}

/// Pulls the completion text out of a completion-endpoint response body
fn extract_completion_text(body: &Value) -> Option<String> {
    let text = body.get("choices")?.get(0)?.get("text")?.as_str()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Summarizer used when no API key is configured
pub struct NoopSummarizer;

#[async_trait]
impl Summarizer for NoopSummarizer {
    async fn summarize(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Builds the summarizer matching the configuration
pub fn build_summarizer(client: Client, config: &SummarizerConfig) -> Arc<dyn Summarizer> {
    if config.api_key.is_some() {
        Arc::new(CompletionSummarizer::new(client, config.clone()))
    } else {
        tracing::info!("No summarizer API key configured; summaries disabled");
        Arc::new(NoopSummarizer)
    }
}
