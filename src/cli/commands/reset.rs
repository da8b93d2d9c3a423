//! Reset command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::vector_store::{EvidenceStore, SqliteEvidenceStore};
use anyhow::Result;
use console::style;
use std::io::{self, Write};

/// Run the reset command.
pub async fn run_reset(user: &str, yes: bool, settings: Settings) -> Result<()> {
    let store = SqliteEvidenceStore::new(&settings.sqlite_path())?;

    let count = store.count(user).await?;
    if count == 0 {
        Output::info(&format!("No stored evidence for namespace '{}'.", user));
        return Ok(());
    }

    if !yes && !prompt_confirm(&format!("Delete {} chunks for namespace '{}'?", count, user))? {
        Output::info("Reset cancelled.");
        return Ok(());
    }

    let deleted = store.reset(user).await?;
    Output::success(&format!(
        "Deleted {} chunks for namespace '{}'.",
        deleted, user
    ));

    Ok(())
}

/// Prompt user for yes/no confirmation.
fn prompt_confirm(message: &str) -> io::Result<bool> {
    print!("{} {} {} ", style("?").cyan(), message, style("[y/N]").dim());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
