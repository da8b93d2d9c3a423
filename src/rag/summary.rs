//! RAG summary generation.

use super::{format_context_for_prompt, ContextChunk};
use crate::config::Prompts;
use crate::llm::ChatModel;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Returned in place of a summary when the model call fails.
pub const GENERATION_FAILED_ANSWER: &str =
    "I wasn't able to generate a summary for this query. Please try again.";

/// Generates grounded, cited summaries from retrieved evidence.
pub struct SummaryGenerator {
    model: Arc<dyn ChatModel>,
    prompts: Prompts,
}

/// A generated summary together with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedSummary {
    /// The model's raw answer text (or the failure sentinel).
    pub text: String,
    /// The rendered user prompt, kept for debug display.
    pub prompt: String,
}

impl SummaryGenerator {
    /// Create a new summary generator.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Generate a cited summary for a question grounded in the evidence.
    ///
    /// The prompt restricts the model to the supplied context, mandates the
    /// fixed insufficient-context fallback sentence, and mandates
    /// `[Source: URL]` citation markers. A model-call failure degrades to a
    /// sentinel message rather than propagating.
    #[instrument(skip(self, evidence), fields(question = %question, chunks = evidence.len()))]
    pub async fn summarize(&self, question: &str, evidence: &[ContextChunk]) -> GeneratedSummary {
        let context_text = format_context_for_prompt(evidence);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let user_prompt = self.prompts.render_with_custom(&self.prompts.rag.user, &vars);
        let system_prompt = self
            .prompts
            .render_with_custom(&self.prompts.rag.system, &HashMap::new());

        let text = match self.model.generate(&system_prompt, &user_prompt).await {
            Ok(answer) => {
                debug!("Generated summary ({} chars)", answer.len());
                answer
            }
            Err(e) => {
                warn!("Summary generation failed, degrading to message: {}", e);
                GENERATION_FAILED_ANSWER.to_string()
            }
        };

        GeneratedSummary {
            text,
            prompt: user_prompt,
        }
    }
}
