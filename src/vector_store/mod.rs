//! Evidence store abstraction for Granske.
//!
//! Provides a trait-based interface for different vector store backends.
//! The store is the only shared mutable resource in the pipeline: chunk ids
//! are freshly generated per write, so concurrent ingestions for different
//! queries never contend on the same row, and retrieval runs concurrently
//! with ingestion of other queries.

mod memory;
mod sqlite;

pub use memory::MemoryEvidenceStore;
pub use sqlite::SqliteEvidenceStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace used when the caller does not partition memory per user.
///
/// Callers always pass a namespace explicitly; this constant is the
/// documented default rather than a magic string inside the store layer.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A chunk of evidence stored in the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceChunk {
    /// Unique chunk ID, generated at write time.
    pub id: Uuid,
    /// Text content of this chunk.
    pub text: String,
    /// Embedding vector. Immutable once stored.
    pub embedding: Vec<f32>,
    /// Originating URL (provenance).
    pub source: String,
    /// Namespace key partitioning memory per caller.
    pub user: String,
    /// When this chunk was stored (UTC). Set once, never mutated.
    pub created_at: DateTime<Utc>,
}

impl EvidenceChunk {
    /// Create a new evidence chunk with a fresh id and timestamp.
    pub fn new(text: String, embedding: Vec<f32>, source: String, user: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            embedding,
            source,
            user,
            created_at: Utc::now(),
        }
    }
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk.
    pub chunk: EvidenceChunk,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for evidence store implementations.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Store a chunk with its embedding.
    async fn upsert(&self, chunk: &EvidenceChunk) -> Result<()>;

    /// Bulk upsert chunks.
    async fn upsert_batch(&self, chunks: &[EvidenceChunk]) -> Result<usize>;

    /// Query for the `top_k` most similar chunks within a namespace.
    ///
    /// Results are ordered by similarity, descending; order among chunks
    /// with equal scores is unspecified. An empty namespace yields an empty
    /// result, not an error.
    async fn query(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        user: &str,
    ) -> Result<Vec<ScoredChunk>>;

    /// Delete all chunks in a namespace, returning the number removed.
    async fn reset(&self, user: &str) -> Result<usize>;

    /// Count the chunks stored in a namespace.
    async fn count(&self, user: &str) -> Result<usize>;

    /// Distinct source URLs stored in a namespace, most recent first.
    async fn list_sources(&self, user: &str) -> Result<Vec<String>>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
