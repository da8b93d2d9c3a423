//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
            Output::info(&format!(
                "Saved to {}",
                Settings::default_config_path().display()
            ));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply a `section.key = value` assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.data_dir" => settings.general.data_dir = value.to_string(),
        "general.log_level" => settings.general.log_level = value.to_string(),
        "search.provider" => settings.search.provider = value.to_string(),
        "search.max_pages" => settings.search.max_pages = parse_number(key, value)?,
        "fetch.timeout_seconds" => settings.fetch.timeout_seconds = parse_number(key, value)?,
        "fetch.user_agent" => settings.fetch.user_agent = value.to_string(),
        "embedding.provider" => settings.embedding.provider = value.to_string(),
        "embedding.model" => settings.embedding.model = value.to_string(),
        "embedding.dimensions" => settings.embedding.dimensions = parse_number(key, value)?,
        "chunking.max_words" => settings.chunking.max_words = parse_number(key, value)?,
        "vector_store.provider" => settings.vector_store.provider = value.to_string(),
        "vector_store.sqlite_path" => settings.vector_store.sqlite_path = value.to_string(),
        "rag.model" => settings.rag.model = value.to_string(),
        "rag.top_k" => settings.rag.top_k = parse_number(key, value)?,
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown configuration key: {} (see 'granske config show' for valid keys)",
                key
            ))
        }
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("{} expects a number, got '{}'", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_string_value() {
        let mut settings = Settings::default();
        set_value(&mut settings, "rag.model", "gpt-4o").unwrap();
        assert_eq!(settings.rag.model, "gpt-4o");
    }

    #[test]
    fn test_set_numeric_value() {
        let mut settings = Settings::default();
        set_value(&mut settings, "search.max_pages", "7").unwrap();
        set_value(&mut settings, "rag.top_k", "10").unwrap();
        assert_eq!(settings.search.max_pages, 7);
        assert_eq!(settings.rag.top_k, 10);
    }

    #[test]
    fn test_set_rejects_non_numeric() {
        let mut settings = Settings::default();
        let err = set_value(&mut settings, "chunking.max_words", "lots").unwrap_err();
        assert!(err.to_string().contains("expects a number"));
        assert_eq!(settings.chunking.max_words, 800);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut settings = Settings::default();
        let err = set_value(&mut settings, "rag.temperature", "0.5").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }
}
