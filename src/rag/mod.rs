//! Retrieval and summary generation.
//!
//! Retrieval pulls the most relevant evidence chunks for a query out of the
//! store; the summary generator grounds an LLM answer in that evidence.

mod retriever;
mod summary;

pub use retriever::{format_context_for_prompt, Retriever};
pub use summary::{GeneratedSummary, SummaryGenerator, GENERATION_FAILED_ANSWER};

use crate::vector_store::ScoredChunk;

/// A retrieved evidence chunk with provenance, ready for prompting.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Originating URL.
    pub source: String,
    /// Text content.
    pub text: String,
    /// Similarity score.
    pub score: f32,
}

impl From<ScoredChunk> for ContextChunk {
    fn from(result: ScoredChunk) -> Self {
        Self {
            source: result.chunk.source,
            text: result.chunk.text,
            score: result.score,
        }
    }
}
