//! CLI module for Granske.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::vector_store::DEFAULT_NAMESPACE;
use clap::{Parser, Subcommand};

/// Granske - Research Assistant with Live Web Memory
///
/// A CLI tool that searches the web live, stores evidence in a per-user
/// vector memory, and answers questions with cited, fact-checked summaries.
/// The name "Granske" comes from the Norwegian word for "investigate."
#[derive(Parser, Debug)]
#[command(name = "granske")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Granske and verify configuration
    Init,

    /// Check API keys, database, and configuration
    Doctor,

    /// Ask a question: search the web, ingest evidence, and answer with fact-checks
    Ask {
        /// The question to research
        question: String,

        /// Maximum number of web pages to ingest (default: search.max_pages from config)
        #[arg(short, long)]
        pages: Option<usize>,

        /// Number of evidence chunks to retrieve (default: rag.top_k from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Memory namespace to read and write
        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        user: String,

        /// Override the LLM model for this question
        #[arg(short, long)]
        model: Option<String>,

        /// Print the rendered RAG prompt (debug)
        #[arg(long)]
        show_prompt: bool,
    },

    /// Ingest web evidence for a query without generating an answer
    Ingest {
        /// The query to research
        query: String,

        /// Maximum number of web pages to ingest (default: search.max_pages from config)
        #[arg(short, long)]
        pages: Option<usize>,

        /// Memory namespace to write into
        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        user: String,
    },

    /// Search stored evidence without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results (default: rag.top_k from config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Memory namespace to search
        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        user: String,
    },

    /// Delete all stored evidence for a namespace
    Reset {
        /// Memory namespace to clear
        #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
        user: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., rag.model)
        key: String,
        /// New value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_knobs_unset_defer_to_config() {
        let cli = Cli::parse_from(["granske", "ask", "what changed?"]);
        match cli.command {
            Commands::Ask {
                pages, top_k, user, ..
            } => {
                assert!(pages.is_none());
                assert!(top_k.is_none());
                assert_eq!(user, DEFAULT_NAMESPACE);
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_ask_knobs_parse_overrides() {
        let cli = Cli::parse_from(["granske", "ask", "q", "-p", "7", "-k", "2", "-u", "alice"]);
        match cli.command {
            Commands::Ask {
                pages, top_k, user, ..
            } => {
                assert_eq!(pages, Some(7));
                assert_eq!(top_k, Some(2));
                assert_eq!(user, "alice");
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn test_search_limit_unset_defers_to_config() {
        let cli = Cli::parse_from(["granske", "search", "q"]);
        match cli.command {
            Commands::Search { limit, .. } => assert!(limit.is_none()),
            _ => panic!("expected search command"),
        }
    }
}
