//! Web page fetching and text extraction.
//!
//! The fetcher contract is deliberately forgiving: any download or parse
//! failure yields an empty string, never an error. The ingestion pipeline
//! treats an empty extraction as a skippable page.

use crate::config::FetchSettings;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Trait for fetching readable text from a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download a page and return its readable text, or an empty string on
    /// any failure.
    async fn fetch_text(&self, url: &str) -> String;
}

/// HTTP fetcher extracting paragraph text from HTML.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Create a fetcher from fetch settings.
    pub fn new(settings: &FetchSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new(&FetchSettings::default())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        let html = match self.client.get(url).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Failed to read body from {}: {}", url, e);
                    return String::new();
                }
            },
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return String::new();
            }
        };

        let text = extract_paragraph_text(&html);
        debug!("Extracted {} characters from {}", text.len(), url);
        text
    }
}

/// Extract readable text from the `<p>` elements of an HTML document.
///
/// Paragraphs are trimmed and joined with newlines; empty paragraphs are
/// dropped. Non-HTML input simply yields no paragraphs.
pub fn extract_paragraph_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // "p" is a valid selector, so this cannot fail.
    let selector = match Selector::parse("p") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|p| {
            p.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|block| !block.is_empty())
        .collect();

    blocks.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_paragraphs() {
        let html = r#"
            <html><body>
                <h1>Title</h1>
                <p>First paragraph.</p>
                <p>  Second   paragraph. </p>
                <p></p>
            </body></html>
        "#;
        let text = extract_paragraph_text(html);
        assert_eq!(text, "First paragraph.\nSecond paragraph.");
    }

    #[test]
    fn test_ignores_non_paragraph_content() {
        let html = "<html><body><div>not a paragraph</div><script>var x;</script></body></html>";
        assert_eq!(extract_paragraph_text(html), "");
    }

    #[test]
    fn test_nested_markup_inside_paragraph() {
        let html = "<p>Rust is <b>fast</b> and <i>safe</i>.</p>";
        assert_eq!(extract_paragraph_text(html), "Rust is fast and safe .");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_returns_empty() {
        let fetcher = HttpPageFetcher::default();
        let text = fetcher.fetch_text("http://invalid.localdomain.granske.test/").await;
        assert!(text.is_empty());
    }
}
