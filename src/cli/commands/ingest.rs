//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(
    query: &str,
    pages: Option<usize>,
    user: &str,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ingest) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granske doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let pages = pages.unwrap_or(settings.search.max_pages);
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Researching online...");

    match orchestrator.ingest(query, user, pages).await {
        Ok(report) => {
            spinner.finish_and_clear();

            Output::success(&format!(
                "Stored {} chunks from {} pages",
                report.chunks_stored, report.pages_ingested
            ));

            for source in &report.sources {
                Output::list_item(source);
            }

            if !report.skipped.is_empty() {
                Output::warning(&format!("Skipped {} page(s):", report.skipped.len()));
                for skipped in &report.skipped {
                    Output::list_item(&format!("{} ({})", skipped.url, skipped.reason));
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
