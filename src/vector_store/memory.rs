//! In-memory evidence store implementation.
//!
//! Useful for testing and small datasets.

use super::{cosine_similarity, EvidenceChunk, EvidenceStore, ScoredChunk};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory evidence store.
pub struct MemoryEvidenceStore {
    chunks: RwLock<HashMap<String, EvidenceChunk>>,
}

impl MemoryEvidenceStore {
    /// Create a new in-memory evidence store.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryEvidenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn upsert(&self, chunk: &EvidenceChunk) -> Result<()> {
        let mut chunks = self.chunks.write().unwrap();
        chunks.insert(chunk.id.to_string(), chunk.clone());
        Ok(())
    }

    async fn upsert_batch(&self, batch: &[EvidenceChunk]) -> Result<usize> {
        let mut chunks = self.chunks.write().unwrap();
        for chunk in batch {
            chunks.insert(chunk.id.to_string(), chunk.clone());
        }
        Ok(batch.len())
    }

    async fn query(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        user: &str,
    ) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read().unwrap();

        let mut results: Vec<ScoredChunk> = chunks
            .values()
            .filter(|c| c.user == user)
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }

    async fn reset(&self, user: &str) -> Result<usize> {
        let mut chunks = self.chunks.write().unwrap();
        let initial_len = chunks.len();
        chunks.retain(|_, chunk| chunk.user != user);
        Ok(initial_len - chunks.len())
    }

    async fn count(&self, user: &str) -> Result<usize> {
        let chunks = self.chunks.read().unwrap();
        Ok(chunks.values().filter(|c| c.user == user).count())
    }

    async fn list_sources(&self, user: &str) -> Result<Vec<String>> {
        let chunks = self.chunks.read().unwrap();

        let mut by_source: Vec<&EvidenceChunk> =
            chunks.values().filter(|c| c.user == user).collect();
        by_source.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut sources = Vec::new();
        for chunk in by_source {
            if !sources.contains(&chunk.source) {
                sources.push(chunk.source.clone());
            }
        }
        Ok(sources)
    }
}
