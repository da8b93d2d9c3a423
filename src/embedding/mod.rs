//! Embedding generation for semantic retrieval.
//!
//! The embedder is an explicitly constructed collaborator: it is built once
//! at startup and passed by handle to the components that need it, so tests
//! can substitute a fake. Write and query paths must use the same embedder
//! instance, otherwise stored and query vector dimensions diverge.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;
}
