//! Query-to-answer coordination.
//!
//! Runs one research transaction: ingest live web evidence, retrieve the
//! most relevant chunks, generate a grounded summary, and verify its claims
//! against the same evidence. Ingestion always completes before retrieval
//! reads memory, so the summary can see evidence gathered in this call.

use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::factcheck::{annotate_summary, FactCheckReport, FactChecker};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::ingest::{IngestPipeline, IngestReport};
use crate::llm::{ChatModel, OpenAiChat};
use crate::rag::{format_context_for_prompt, Retriever, SummaryGenerator};
use crate::search::{SerpApiSearcher, WebSearcher};
use crate::vector_store::{EvidenceStore, SqliteEvidenceStore};
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Granske pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    searcher: Arc<dyn WebSearcher>,
    fetcher: Arc<dyn PageFetcher>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn EvidenceStore>,
    chat_model: Arc<dyn ChatModel>,
    fact_checker: FactChecker,
}

/// The final composite result of one query.
#[derive(Debug)]
pub struct Answer {
    /// The original query.
    pub query: String,
    /// Raw model output (or the degrade-to-message sentinel).
    pub summary: String,
    /// Claim verification against the retrieved evidence.
    pub fact_check: FactCheckReport,
    /// Summary annotated with the fact-check block.
    pub final_output: String,
    /// Ordered distinct provenance URLs consulted in this call.
    pub sources: Vec<String>,
    /// The rendered RAG prompt, for debug display.
    pub prompt: String,
    /// What ingestion stored and skipped.
    pub ingest: IngestReport,
}

impl Orchestrator {
    /// Create a new orchestrator with default collaborators.
    ///
    /// Fails with a configuration error when the search credential is
    /// missing; that check happens here so a broken setup surfaces before
    /// any work starts.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let searcher = Arc::new(SerpApiSearcher::from_env()?);
        let fetcher = Arc::new(HttpPageFetcher::new(&settings.fetch));

        // Constructed once and shared so write and query paths embed with
        // the same model and dimension.
        let embedder = Arc::new(OpenAIEmbedder::with_config(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
        ));

        let store = Arc::new(SqliteEvidenceStore::new(&settings.sqlite_path())?);
        let chat_model = Arc::new(OpenAiChat::new(&settings.rag.model));

        Ok(Self {
            settings,
            prompts,
            searcher,
            fetcher,
            embedder,
            store,
            chat_model,
            fact_checker: FactChecker::new(),
        })
    }

    /// Create an orchestrator with custom components.
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        searcher: Arc<dyn WebSearcher>,
        fetcher: Arc<dyn PageFetcher>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn EvidenceStore>,
        chat_model: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            settings,
            prompts,
            searcher,
            fetcher,
            embedder,
            store,
            chat_model,
            fact_checker: FactChecker::new(),
        }
    }

    /// Get a reference to the evidence store.
    pub fn store(&self) -> Arc<dyn EvidenceStore> {
        self.store.clone()
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ingest live web evidence for a query without answering it.
    pub async fn ingest(&self, query: &str, user: &str, pages: usize) -> Result<IngestReport> {
        self.ingest_pipeline().ingest(query, user, pages).await
    }

    /// Answer a query: ingest, retrieve, generate, and fact-check.
    ///
    /// Generation runs even when ingestion stored zero chunks, and
    /// verification runs on whatever text generation returned, including
    /// its failure sentinel. Only an ingestion-level failure (search
    /// credential or provider outage) propagates as an error.
    #[instrument(skip(self), fields(query = %query, user = %user))]
    pub async fn answer_query(
        &self,
        query: &str,
        top_k: usize,
        user: &str,
        pages: usize,
    ) -> Result<Answer> {
        // Ingest: update memory with live evidence for this query.
        let ingest = self.ingest_pipeline().ingest(query, user, pages).await?;

        // Retrieve once; the same evidence grounds generation and verification.
        let retriever = Retriever::new(self.store.clone(), self.embedder.clone())
            .with_top_k(top_k);
        let evidence = retriever.retrieve(query, user).await?;
        info!("Retrieved {} evidence chunks", evidence.len());

        // Generate.
        let generator = SummaryGenerator::new(self.chat_model.clone())
            .with_prompts(self.prompts.clone());
        let generated = generator.summarize(query, &evidence).await;

        // Verify.
        let context_text = format_context_for_prompt(&evidence);
        let fact_check = self.fact_checker.verify(&generated.text, &context_text);
        let final_output = annotate_summary(&generated.text, &fact_check);

        Ok(Answer {
            query: query.to_string(),
            summary: generated.text,
            fact_check,
            final_output,
            sources: ingest.sources.clone(),
            prompt: generated.prompt,
            ingest,
        })
    }

    fn ingest_pipeline(&self) -> IngestPipeline {
        IngestPipeline::new(
            self.searcher.clone(),
            self.fetcher.clone(),
            self.embedder.clone(),
            self.store.clone(),
            self.settings.chunking.max_words,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GranskeError;
    use crate::testing::{FakeChat, FakeEmbedder, FakeFetcher, FakeSearcher};
    use crate::vector_store::{MemoryEvidenceStore, DEFAULT_NAMESPACE};

    fn orchestrator(searcher: FakeSearcher, fetcher: FakeFetcher, chat: FakeChat) -> Orchestrator {
        Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(searcher),
            Arc::new(fetcher),
            Arc::new(FakeEmbedder::new(8)),
            Arc::new(MemoryEvidenceStore::new()),
            Arc::new(chat),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_supported_claim() {
        let searcher = FakeSearcher::with_urls(vec!["https://evidence.example".to_string()]);
        let fetcher = FakeFetcher::new()
            .with_page("https://evidence.example", "Research confirms X causes Y in trials");
        let chat = FakeChat::answering("X causes Y.");

        let orchestrator = orchestrator(searcher, fetcher, chat);
        let answer = orchestrator
            .answer_query("Does X cause Y?", 5, DEFAULT_NAMESPACE, 1)
            .await
            .unwrap();

        assert_eq!(answer.summary, "X causes Y.");
        assert_eq!(answer.fact_check.total_claims(), 1);
        assert_eq!(answer.fact_check.supported, vec!["X causes Y"]);
        assert!(answer.fact_check.not_supported.is_empty());
        assert!(answer.final_output.contains("Supported claims: 1/1"));
        assert!(!answer.final_output.contains("could not be verified"));
        assert_eq!(answer.sources, vec!["https://evidence.example"]);
    }

    #[tokio::test]
    async fn test_unsupported_claim_is_flagged() {
        let searcher = FakeSearcher::with_urls(vec!["https://evidence.example".to_string()]);
        let fetcher = FakeFetcher::new()
            .with_page("https://evidence.example", "Nothing relevant here at all");
        let chat = FakeChat::answering("The moon is made of cheese.");

        let orchestrator = orchestrator(searcher, fetcher, chat);
        let answer = orchestrator
            .answer_query("What is the moon made of?", 5, DEFAULT_NAMESPACE, 1)
            .await
            .unwrap();

        assert_eq!(answer.fact_check.not_supported.len(), 1);
        assert!(answer.final_output.contains("Unsupported claims: 1/1"));
        assert!(answer
            .final_output
            .contains("Some statements could not be verified from retrieved sources."));
    }

    #[tokio::test]
    async fn test_zero_chunks_still_generates_and_verifies() {
        // Every page fails to fetch: ingestion writes nothing, but the
        // pipeline still proceeds through generation and verification.
        let searcher = FakeSearcher::with_urls(vec!["https://dead.example".to_string()]);
        let chat = FakeChat::answering(crate::config::INSUFFICIENT_CONTEXT_ANSWER);

        let orchestrator = orchestrator(searcher, FakeFetcher::new(), chat);
        let answer = orchestrator
            .answer_query("Anything?", 5, DEFAULT_NAMESPACE, 1)
            .await
            .unwrap();

        assert_eq!(answer.summary, crate::config::INSUFFICIENT_CONTEXT_ANSWER);
        assert_eq!(answer.ingest.chunks_stored, 0);
        assert_eq!(answer.ingest.skipped.len(), 1);
        assert!(answer.sources.is_empty());
        assert!(answer.final_output.contains("Fact Check Results"));
    }

    #[tokio::test]
    async fn test_model_failure_sentinel_is_still_verified() {
        let searcher = FakeSearcher::with_urls(vec!["https://evidence.example".to_string()]);
        let fetcher =
            FakeFetcher::new().with_page("https://evidence.example", "some stored evidence");

        let orchestrator = orchestrator(searcher, fetcher, FakeChat::failing());
        let answer = orchestrator
            .answer_query("q", 5, DEFAULT_NAMESPACE, 1)
            .await
            .unwrap();

        assert_eq!(answer.summary, crate::rag::GENERATION_FAILED_ANSWER);
        // The sentinel text is not in the evidence, so its claims are unsupported.
        assert!(answer.fact_check.is_assessed());
        assert!(answer.fact_check.supported.is_empty());
    }

    #[tokio::test]
    async fn test_search_outage_fails_the_request() {
        let orchestrator = orchestrator(
            FakeSearcher::failing("quota exceeded"),
            FakeFetcher::new(),
            FakeChat::answering("unused"),
        );

        let err = orchestrator
            .answer_query("q", 5, DEFAULT_NAMESPACE, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, GranskeError::Search(_)));
    }

    #[tokio::test]
    async fn test_answers_are_namespace_scoped() {
        let searcher = FakeSearcher::with_urls(vec!["https://alice.example".to_string()]);
        let fetcher =
            FakeFetcher::new().with_page("https://alice.example", "alice evidence text");
        let orchestrator = orchestrator(searcher, fetcher, FakeChat::answering("ok."));

        orchestrator
            .answer_query("q", 5, "alice", 1)
            .await
            .unwrap();

        assert_eq!(orchestrator.store().count("alice").await.unwrap(), 1);
        assert_eq!(orchestrator.store().count("bob").await.unwrap(), 0);
    }
}
