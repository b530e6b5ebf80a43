//! YouTube content handler
//!
//! Dispatches on the URL path: watch pages get scraped for title and
//! metadata, playlists and channels get minimal records. Link discovery
//! keeps only same-site `/watch` links and rebuilds each with just its `v`
//! parameter, collapsing the long tracking-laden hrefs YouTube emits.

use crate::fetch::fetch_text;
use crate::handlers::{Extraction, Handler, HandlerResult, LinkSource};
use crate::summarize::Summarizer;
use crate::url::{normalized_hostname, query_params};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::json;
use std::sync::{Arc, Mutex};
use url::Url;

const SUPPORTED_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

struct PageCache {
    url: String,
    body: String,
}

pub struct YoutubeHandler {
    client: Client,
    summarizer: Arc<dyn Summarizer>,
    cache: Mutex<Option<PageCache>>,
}

impl YoutubeHandler {
    pub fn new(client: Client, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            client,
            summarizer,
            cache: Mutex::new(None),
        }
    }

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

    async fn extract_watch(&self, url: &Url, video_id: &str) -> HandlerResult<Extraction> {
        let body = self.page_body(url).await?;
        let title = page_title(&body);

        let summary = match &title {
            Some(title) => {
                self.summarizer
                    .summarize(&format!(
                        "Summarize what this video is about from its title: {}",
                        title
                    ))
                    .await
            }
            None => None,
        };

        Ok(Extraction {
            content: title.clone(),
            summary,
            raw_source: Some(body),
            data: Some(json!({
                "video_id": video_id,
                "title": title,
            })),
        })
    }
}

#[async_trait]
impl Handler for YoutubeHandler {
    fn name(&self) -> &str {
        "youtube"
    }

    fn supports(&self, hostname: &str) -> bool {
        SUPPORTED_HOSTS.contains(&hostname)
    }

    async fn extract(&self, url: &Url) -> HandlerResult<Extraction> {
        let params = query_params(url);

        match url.path() {
            "/" => Ok(Extraction::summary_only("YouTube homepage.")),
            "/watch" => match params.get("v") {
                Some(video_id) => self.extract_watch(url, video_id).await,
                None => Ok(Extraction::empty()),
            },
            "/playlist" => Ok(Extraction {
                data: Some(json!({ "playlist_id": params.get("list") })),
                ..Extraction::default()
            }),
            path if path.starts_with("/channel") || path.starts_with("/@") => {
                Ok(Extraction::summary_only("YouTube channel."))
            }
            _ => Ok(Extraction::empty()),
        }
    }

    fn as_link_source(&self) -> Option<&dyn LinkSource> {
        Some(self)
    }
}

#[async_trait]
impl LinkSource for YoutubeHandler {
    async fn discover_links(&self, url: &Url) -> HandlerResult<Vec<String>> {
        let body = self.page_body(url).await?;

        let document = Html::parse_document(&body);
        let mut links = Vec::new();
        let mut seen = std::collections::HashSet::new();

        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                let Some(canonical) = canonical_watch_link(href, url) else {
                    continue;
                };
                if seen.insert(canonical.clone()) {
                    links.push(canonical);
                }
            }
        }

        Ok(links)
    }
}

/// Reduces an href to a canonical watch URL, if it is one
///
/// Relative hrefs resolve against the page URL; anything that is not a
/// youtube.com `/watch` link with a `v` parameter is dropped.
fn canonical_watch_link(href: &str, base: &Url) -> Option<String> {
    let resolved = base.join(href).ok()?;

    if normalized_hostname(&resolved)? != "youtube.com" {
        return None;
    }
    if resolved.path() != "/watch" {
        return None;
    }

    let video_id = query_params(&resolved).remove("v")?;
    Some(format!("https://youtube.com/watch?v={}", video_id))
}

fn page_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
