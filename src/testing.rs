//! Fake collaborators for tests.

use crate::embedding::Embedder;
use crate::error::{GranskeError, Result};
use crate::fetch::PageFetcher;
use crate::llm::ChatModel;
use crate::search::WebSearcher;
use async_trait::async_trait;
use std::collections::HashMap;

/// Searcher returning a fixed URL list, or a fixed error.
pub struct FakeSearcher {
    urls: Vec<String>,
    error: Option<String>,
}

impl FakeSearcher {
    pub fn with_urls(urls: Vec<String>) -> Self {
        Self { urls, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            urls: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl WebSearcher for FakeSearcher {
    async fn search(&self, _query: &str, num_results: usize) -> Result<Vec<String>> {
        if let Some(reason) = &self.error {
            return Err(GranskeError::Search(reason.clone()));
        }
        Ok(self.urls.iter().take(num_results).cloned().collect())
    }
}

/// Fetcher serving canned page text; unknown URLs yield empty text.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        self.pages.get(url).cloned().unwrap_or_default()
    }
}

/// Deterministic embedder hashing text into a fixed-dimension vector.
pub struct FakeEmbedder {
    dimensions: usize,
}

impl FakeEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_one(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Chat model returning a canned answer, or a fixed error.
pub struct FakeChat {
    answer: Option<String>,
}

impl FakeChat {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { answer: None }
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn generate(&self, _system: &str, _user: &str) -> Result<String> {
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => Err(GranskeError::OpenAI("model unavailable".to_string())),
        }
    }
}
