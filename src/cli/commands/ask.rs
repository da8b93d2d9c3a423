//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Settings, INSUFFICIENT_CONTEXT_ANSWER};
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    pages: Option<usize>,
    top_k: Option<usize>,
    user: &str,
    model: Option<String>,
    show_prompt: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granske doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    if let Some(model) = model {
        settings.rag.model = model;
    }
    let pages = pages.unwrap_or(settings.search.max_pages);
    let top_k = top_k.unwrap_or(settings.rag.top_k);

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Searching the web and generating an answer...");

    match orchestrator.answer_query(question, top_k, user, pages).await {
        Ok(answer) => {
            spinner.finish_and_clear();

            println!("\n{}\n", answer.final_output);

            if answer.summary.trim() == INSUFFICIENT_CONTEXT_ANSWER {
                Output::info(
                    "Memory had no relevant evidence. Try more pages with --pages, or a broader 'granske ingest'.",
                );
            }

            Output::fact_check(
                answer.fact_check.supported.len(),
                answer.fact_check.not_supported.len(),
                answer.fact_check.total_claims(),
            );

            if !answer.sources.is_empty() {
                Output::header("Sources");
                for source in &answer.sources {
                    Output::list_item(source);
                }
            }

            if !answer.ingest.skipped.is_empty() {
                Output::header("Skipped pages");
                for skipped in &answer.ingest.skipped {
                    Output::list_item(&format!("{} ({})", skipped.url, skipped.reason));
                }
            }

            if show_prompt {
                Output::header("RAG prompt");
                println!("{}", answer.prompt);
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer question: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
