//! Live web search abstraction.
//!
//! The searcher turns a query into a bounded list of result URLs. A search
//! failure is fatal to the ingestion call that needed it; missing credentials
//! are reported as a configuration error before any request is made.

use crate::error::{GranskeError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Environment variable holding the SerpAPI credential.
pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";

/// Trait for live web search providers.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search for a query and return up to `num_results` result URLs.
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>>;
}

/// SerpAPI-backed Google search.
pub struct SerpApiSearcher {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

impl SerpApiSearcher {
    /// Create a searcher from the `SERPAPI_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(SERPAPI_KEY_ENV).map_err(|_| {
            GranskeError::Config(format!(
                "{} not set. Set it with: export {}='...'",
                SERPAPI_KEY_ENV, SERPAPI_KEY_ENV
            ))
        })?;
        if api_key.is_empty() {
            return Err(GranskeError::Config(format!("{} is empty", SERPAPI_KEY_ENV)));
        }
        Ok(Self::with_api_key(api_key))
    }

    /// Create a searcher with an explicit API key.
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl WebSearcher for SerpApiSearcher {
    #[instrument(skip(self), fields(query = %query))]
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<String>> {
        let response = self
            .client
            .get("https://serpapi.com/search.json")
            .query(&[
                ("q", query),
                ("num", &num_results.to_string()),
                ("engine", "google"),
                ("api_key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| GranskeError::Search(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GranskeError::Search(format!(
                "Provider returned status {}",
                response.status()
            )));
        }

        let body: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| GranskeError::Search(format!("Invalid response: {}", e)))?;

        let urls: Vec<String> = body
            .organic_results
            .into_iter()
            .filter_map(|r| r.link)
            .filter(|link| url::Url::parse(link).is_ok())
            .take(num_results)
            .collect();

        debug!("Search returned {} result URLs", urls.len());
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "organic_results": [
                {"link": "https://example.com/a", "title": "A"},
                {"title": "no link"},
                {"link": "https://example.com/b"}
            ]
        }"#;
        let parsed: SerpApiResponse = serde_json::from_str(json).unwrap();
        let links: Vec<String> = parsed
            .organic_results
            .into_iter()
            .filter_map(|r| r.link)
            .collect();
        assert_eq!(links, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_response_without_results() {
        let parsed: SerpApiResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic_results.is_empty());
    }
}
