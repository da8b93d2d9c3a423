//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::rag::Retriever;
use crate::vector_store::{EvidenceStore, SqliteEvidenceStore};
use anyhow::Result;
use std::sync::Arc;

/// Run the search command.
pub async fn run_search(
    query: &str,
    limit: Option<usize>,
    user: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granske doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let limit = limit.unwrap_or(settings.rag.top_k);
    let (store, embedder) = open_reader(&settings)?;
    let retriever = Retriever::new(store, embedder).with_top_k(limit);

    let spinner = Output::spinner("Searching stored evidence...");

    let results = retriever.retrieve(query, user).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            if chunks.is_empty() {
                Output::warning("No stored evidence matched your query.");
                Output::info("Run 'granske ingest \"<query>\"' to add evidence first.");
            } else {
                Output::success(&format!("Found {} results", chunks.len()));

                for chunk in &chunks {
                    Output::evidence(&chunk.source, chunk.score, &chunk.text);
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Open the store and embedder for reading stored evidence.
///
/// Searching never touches the web, so no search credential is needed here.
fn open_reader(
    settings: &Settings,
) -> crate::error::Result<(Arc<dyn EvidenceStore>, Arc<dyn Embedder>)> {
    let store = Arc::new(SqliteEvidenceStore::new(&settings.sqlite_path())?);
    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));
    Ok((store, embedder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SERPAPI_KEY_ENV;
    use crate::vector_store::DEFAULT_NAMESPACE;

    #[tokio::test]
    async fn test_reader_opens_without_search_credential() {
        std::env::remove_var(SERPAPI_KEY_ENV);

        let db_path =
            std::env::temp_dir().join(format!("granske-search-{}.db", uuid::Uuid::new_v4()));
        let mut settings = Settings::default();
        settings.vector_store.sqlite_path = db_path.to_string_lossy().to_string();

        let (store, _embedder) = open_reader(&settings).unwrap();
        assert_eq!(store.count(DEFAULT_NAMESPACE).await.unwrap(), 0);

        let _ = std::fs::remove_file(&db_path);
    }
}
