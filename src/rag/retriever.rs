//! Evidence retrieval for grounding generation and verification.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::EvidenceStore;
use std::sync::Arc;
use tracing::debug;

/// Retrieves ranked evidence for a query from the store.
pub struct Retriever {
    store: Arc<dyn EvidenceStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever.
    pub fn new(store: Arc<dyn EvidenceStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            top_k: 5,
        }
    }

    /// Set the number of chunks to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Retrieve the most relevant evidence chunks for a query.
    ///
    /// The query is embedded once; an empty namespace yields an empty set,
    /// not an error.
    pub async fn retrieve(&self, query: &str, user: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .store
            .query(&query_embedding, self.top_k, user)
            .await?;

        debug!("Retrieved {} chunks for user {}", results.len(), user);

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

/// Format evidence chunks as the grounding context for a prompt.
///
/// Each chunk is rendered with its provenance label:
/// `Source: <url>` followed by the chunk text and a separator.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| format!("Source: {}\n{}\n\n---", chunk.source, chunk.text))
        .collect::<Vec<_>>()
        .join("\n")
}
