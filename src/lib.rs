//! Granske - Research Assistant with Live Web Memory
//!
//! A CLI tool that answers questions by searching the web live, storing the
//! evidence it finds in a per-user vector memory, and generating cited,
//! fact-checked summaries.
//!
//! The name "Granske" comes from the Norwegian word for "investigate."
//!
//! # Overview
//!
//! Granske allows you to:
//! - Run a live web search for any question and ingest the results
//! - Build a persistent, per-user vector memory of evidence chunks
//! - Get AI-generated summaries constrained to the retrieved evidence
//! - See which claims in an answer are supported by the sources
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `search` - Live web search abstraction (SerpAPI)
//! - `fetch` - Web page fetching and text extraction
//! - `chunking` - Splitting page text into embeddable chunks
//! - `embedding` - Embedding generation
//! - `vector_store` - Evidence store abstraction (memory, SQLite)
//! - `ingest` - Search -> fetch -> chunk -> embed -> store pipeline
//! - `rag` - Retrieval and summary generation
//! - `factcheck` - Claim extraction and verification
//! - `orchestrator` - Query-to-answer coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use granske::config::Settings;
//! use granske::orchestrator::Orchestrator;
//! use granske::vector_store::DEFAULT_NAMESPACE;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let answer = orchestrator
//!         .answer_query("Impact of AI on healthcare in 2025", 5, DEFAULT_NAMESPACE, 3)
//!         .await?;
//!     println!("{}", answer.final_output);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod factcheck;
pub mod fetch;
pub mod ingest;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod search;
pub mod vector_store;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{GranskeError, Result};
