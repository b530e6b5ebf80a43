//! Google Docs content handler
//!
//! Spreadsheets are read through the CSV export endpoint; documents and
//! presentations are recognized but not extracted. Link discovery scans the
//! exported CSV cells for URLs.

use crate::handlers::{Extraction, Handler, HandlerResult, LinkSource};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use url::Url;

const SIGNIN_MARKER: &str = "href=\"https://accounts.google.com/v3/signin/";

pub struct GoogleDocsHandler {
    client: Client,
    url_pattern: Regex,
}

impl GoogleDocsHandler {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            url_pattern: Regex::new(r"https?://\S+").unwrap(),
        }
    }

    async fn fetch_sheet_csv(&self, doc_id: &str) -> HandlerResult<String> {
        let export_url = format!(
            "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
            doc_id
        );
        let response = self.client.get(&export_url).send().await?;
        Ok(response.text().await?)
    }

    async fn extract_sheet(&self, doc_id: &str) -> HandlerResult<Extraction> {
        let csv = self.fetch_sheet_csv(doc_id).await?;

        if csv.contains(SIGNIN_MARKER) {
            return Ok(Extraction::summary_only(
                "Unauthorized to access google sheets.",
            ));
        }

        Ok(Extraction {
            summary: Some(csv.clone()),
            raw_source: Some(csv),
            ..Extraction::default()
        })
    }
}

#[async_trait]
impl Handler for GoogleDocsHandler {
    fn name(&self) -> &str {
        "googledocs"
    }

    fn supports(&self, hostname: &str) -> bool {
        hostname == "docs.google.com"
    }

    async fn extract(&self, url: &Url) -> HandlerResult<Extraction> {
        let path = url.path();

        if path.starts_with("/spreadsheets/d/") {
            match doc_id(url) {
                Some(id) => self.extract_sheet(&id).await,
                None => Ok(Extraction::summary_only("No summary found.")),
            }
        } else if path.starts_with("/document/d/") {
            Ok(Extraction::summary_only(
                "No summary found. Docs not supported yet.",
            ))
        } else if path.starts_with("/presentation/d/") {
            Ok(Extraction::summary_only(
                "No summary found. Presentations not supported yet.",
            ))
        } else {
            Ok(Extraction::summary_only("No summary found."))
        }
    }

    fn as_link_source(&self) -> Option<&dyn LinkSource> {
        Some(self)
    }
}

#[async_trait]
impl LinkSource for GoogleDocsHandler {
    async fn discover_links(&self, url: &Url) -> HandlerResult<Vec<String>> {
        let Some(id) = doc_id(url) else {
            return Ok(Vec::new());
        };

        let csv = self.fetch_sheet_csv(&id).await?;
        Ok(scan_cell_links(&csv, &self.url_pattern))
    }
}

/// Document ID: the path segment following `d`
fn doc_id(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    let pos = segments.iter().position(|s| *s == "d")?;
    segments
        .get(pos + 1)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// URLs found in CSV cell values
fn scan_cell_links(csv: &str, pattern: &Regex) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for cell in csv.split(',') {
        for m in pattern.find_iter(cell) {
            let link = m.as_str().to_string();
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id() {
        let url =
            Url::parse("https://docs.google.com/spreadsheets/d/1H7_krp7MRSe3u6K/edit").unwrap();
        assert_eq!(doc_id(&url), Some("1H7_krp7MRSe3u6K".to_string()));
    }

    #[test]
    fn test_doc_id_trailing_slash_only() {
        let url = Url::parse("https://docs.google.com/spreadsheets/d/abc123/").unwrap();
        assert_eq!(doc_id(&url), Some("abc123".to_string()));
    }

    #[test]
    fn test_doc_id_missing() {
        let url = Url::parse("https://docs.google.com/spreadsheets/").unwrap();
        assert_eq!(doc_id(&url), None);
    }

    #[test]
    fn test_scan_cell_links() {
        let pattern = Regex::new(r"https?://\S+").unwrap();
        let csv = "name,link\nfirst,https://example.com/a\nsecond,http://other.test/b,https://example.com/a";

        let links = scan_cell_links(csv, &pattern);
        assert_eq!(
            links,
            vec![
                "https://example.com/a".to_string(),
                "http://other.test/b".to_string(),
            ]
        );
    }

    #[test]
    fn test_supports() {
        let handler = GoogleDocsHandler::new(Client::new());
        assert!(handler.supports("docs.google.com"));
        assert!(!handler.supports("drive.google.com"));
    }
}
