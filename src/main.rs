//! Granske CLI entry point.

use anyhow::Result;
use clap::Parser;
use granske::cli::{commands, Cli, Commands};
use granske::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("granske={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Ask {
            question,
            pages,
            top_k,
            user,
            model,
            show_prompt,
        } => {
            commands::run_ask(
                question,
                *pages,
                *top_k,
                user,
                model.clone(),
                *show_prompt,
                settings,
            )
            .await?;
        }

        Commands::Ingest { query, pages, user } => {
            commands::run_ingest(query, *pages, user, settings).await?;
        }

        Commands::Search { query, limit, user } => {
            commands::run_search(query, *limit, user, settings).await?;
        }

        Commands::Reset { user, yes } => {
            commands::run_reset(user, *yes, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
