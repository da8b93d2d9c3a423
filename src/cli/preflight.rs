//! Pre-flight checks before expensive operations.
//!
//! Validates that required API credentials are present before starting
//! operations that would otherwise fail midway.

use crate::error::{GranskeError, Result};
use crate::search::SERPAPI_KEY_ENV;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Full question answering requires search and OpenAI credentials.
    Ask,
    /// Ingestion requires search and OpenAI (embedding) credentials.
    Ingest,
    /// Searching stored evidence requires only OpenAI (embedding) credentials.
    Search,
    /// Resetting a namespace has no external requirements.
    Reset,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Ingest => {
            check_env_key("OPENAI_API_KEY")?;
            check_env_key(SERPAPI_KEY_ENV)?;
        }
        Operation::Search => {
            check_env_key("OPENAI_API_KEY")?;
        }
        Operation::Reset => {}
    }
    Ok(())
}

/// Check that an environment variable holding a credential is set and non-empty.
fn check_env_key(name: &str) -> Result<()> {
    match std::env::var(name) {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(GranskeError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            name, name
        ))),
        Err(_) => Err(GranskeError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            name, name
        ))),
    }
}
