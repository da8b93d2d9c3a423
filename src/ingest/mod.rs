//! Ingestion pipeline: search -> fetch -> chunk -> embed -> store.
//!
//! One bad page never aborts ingestion of the others; skipped pages are
//! accumulated as diagnostics on the report instead of being logged and
//! forgotten. A failure of the search step itself is fatal to the whole
//! ingestion call.
//!
//! Repeated ingestion of the same query stores new chunk rows with fresh
//! ids rather than deduplicating. Keying storage by a content hash of
//! (text, source) would avoid duplicate growth across repeated queries.

use crate::chunking::chunk_words;
use crate::embedding::Embedder;
use crate::error::{GranskeError, Result};
use crate::fetch::PageFetcher;
use crate::search::WebSearcher;
use crate::vector_store::{EvidenceChunk, EvidenceStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A page that was skipped during ingestion, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedPage {
    /// The URL that was skipped.
    pub url: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Outcome of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Pages whose text was fetched and stored.
    pub pages_ingested: usize,
    /// Total evidence chunks written to the store.
    pub chunks_stored: usize,
    /// Distinct source URLs that contributed chunks, in fetch order.
    pub sources: Vec<String>,
    /// Pages that were skipped, with diagnostics.
    pub skipped: Vec<SkippedPage>,
}

/// The search -> fetch -> chunk -> embed -> store pipeline.
pub struct IngestPipeline {
    searcher: Arc<dyn WebSearcher>,
    fetcher: Arc<dyn PageFetcher>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn EvidenceStore>,
    max_words: usize,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline.
    pub fn new(
        searcher: Arc<dyn WebSearcher>,
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn EvidenceStore>,
        max_words: usize,
    ) -> Self {
        Self {
            searcher,
            fetcher,
            embedder,
            store,
            max_words,
        }
    }

    /// Ingest live web evidence for a query into the given namespace.
    ///
    /// Fetches up to `pages` search results, chunks and embeds their text,
    /// and writes the chunks with provenance. Returns a report of what was
    /// stored and what was skipped. Only a failure of the search step
    /// returns an error.
    #[instrument(skip(self), fields(query = %query, user = %user))]
    pub async fn ingest(&self, query: &str, user: &str, pages: usize) -> Result<IngestReport> {
        if query.trim().is_empty() {
            return Err(GranskeError::InvalidInput("Query is empty".to_string()));
        }

        info!("Researching online for: {}", query);

        let urls = self.searcher.search(query, pages).await?;

        let mut report = IngestReport::default();

        for url in urls {
            let text = self.fetcher.fetch_text(&url).await;
            if text.is_empty() {
                warn!("Skipping {} (no text extracted)", url);
                report.skipped.push(SkippedPage {
                    url,
                    reason: "no text extracted".to_string(),
                });
                continue;
            }

            let texts = chunk_words(&text, self.max_words);
            if texts.is_empty() {
                report.skipped.push(SkippedPage {
                    url,
                    reason: "no chunks produced".to_string(),
                });
                continue;
            }

            let embeddings = match self.embedder.embed_batch(&texts).await {
                Ok(embeddings) => embeddings,
                Err(e) => {
                    warn!("Skipping {} (embedding failed: {})", url, e);
                    report.skipped.push(SkippedPage {
                        url,
                        reason: format!("embedding failed: {}", e),
                    });
                    continue;
                }
            };

            let chunks: Vec<EvidenceChunk> = texts
                .into_iter()
                .zip(embeddings)
                .map(|(text, embedding)| {
                    EvidenceChunk::new(text, embedding, url.clone(), user.to_string())
                })
                .collect();

            match self.store.upsert_batch(&chunks).await {
                Ok(stored) => {
                    report.pages_ingested += 1;
                    report.chunks_stored += stored;
                    if !report.sources.contains(&url) {
                        report.sources.push(url);
                    }
                }
                Err(e) => {
                    warn!("Skipping {} (store write failed: {})", url, e);
                    report.skipped.push(SkippedPage {
                        url,
                        reason: format!("store write failed: {}", e),
                    });
                }
            }
        }

        info!(
            "Ingestion complete: {} chunks from {} pages ({} skipped)",
            report.chunks_stored,
            report.pages_ingested,
            report.skipped.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GranskeError;
    use crate::testing::{FakeEmbedder, FakeFetcher, FakeSearcher};
    use crate::vector_store::{MemoryEvidenceStore, DEFAULT_NAMESPACE};

    fn pipeline(
        searcher: FakeSearcher,
        fetcher: FakeFetcher,
    ) -> (IngestPipeline, Arc<MemoryEvidenceStore>) {
        let store = Arc::new(MemoryEvidenceStore::new());
        let pipeline = IngestPipeline::new(
            Arc::new(searcher),
            Arc::new(fetcher),
            Arc::new(FakeEmbedder::new(4)),
            store.clone(),
            50,
        );
        (pipeline, store)
    }

    #[tokio::test]
    async fn test_ingest_writes_all_pages() {
        let searcher = FakeSearcher::with_urls(vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ]);
        let fetcher = FakeFetcher::new()
            .with_page("https://a.example", "alpha beta gamma")
            .with_page("https://b.example", "delta epsilon");

        let (pipeline, store) = pipeline(searcher, fetcher);
        let report = pipeline
            .ingest("test", DEFAULT_NAMESPACE, 2)
            .await
            .unwrap();

        assert_eq!(report.pages_ingested, 2);
        assert_eq!(report.chunks_stored, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(report.sources.len(), 2);
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_does_not_abort() {
        // Three URLs; the second yields no text.
        let searcher = FakeSearcher::with_urls(vec![
            "https://ok1.example".to_string(),
            "https://bad.example".to_string(),
            "https://ok2.example".to_string(),
        ]);
        let fetcher = FakeFetcher::new()
            .with_page("https://ok1.example", "first page text")
            .with_page("https://ok2.example", "third page text");

        let (pipeline, store) = pipeline(searcher, fetcher);
        let report = pipeline
            .ingest("test", DEFAULT_NAMESPACE, 3)
            .await
            .unwrap();

        assert_eq!(report.pages_ingested, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].url, "https://bad.example");
        assert_eq!(
            report.sources,
            vec!["https://ok1.example", "https://ok2.example"]
        );
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let searcher = FakeSearcher::with_urls(vec!["https://a.example".to_string()]);
        let (pipeline, store) = pipeline(searcher, FakeFetcher::new());

        let err = pipeline
            .ingest("   ", DEFAULT_NAMESPACE, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, GranskeError::InvalidInput(_)));
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_is_fatal() {
        let searcher = FakeSearcher::failing("provider down");
        let (pipeline, store) = pipeline(searcher, FakeFetcher::new());

        let err = pipeline
            .ingest("test", DEFAULT_NAMESPACE, 3)
            .await
            .unwrap_err();
        assert!(matches!(err, GranskeError::Search(_)));
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_long_page_is_split_into_bounded_chunks() {
        let long_text = (0..120).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ");
        let searcher = FakeSearcher::with_urls(vec!["https://long.example".to_string()]);
        let fetcher = FakeFetcher::new().with_page("https://long.example", &long_text);

        let (pipeline, store) = pipeline(searcher, fetcher);
        let report = pipeline
            .ingest("test", DEFAULT_NAMESPACE, 1)
            .await
            .unwrap();

        // 120 words at 50 words per chunk
        assert_eq!(report.chunks_stored, 3);
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reingest_creates_new_rows() {
        let searcher = FakeSearcher::with_urls(vec!["https://a.example".to_string()]);
        let fetcher = FakeFetcher::new().with_page("https://a.example", "same text");

        let (pipeline, store) = pipeline(searcher, fetcher);
        pipeline.ingest("q", DEFAULT_NAMESPACE, 1).await.unwrap();
        pipeline.ingest("q", DEFAULT_NAMESPACE, 1).await.unwrap();

        // Known duplication limitation: fresh ids per run.
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 2);
    }
}
