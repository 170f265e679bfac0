use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Locales
    pub supported_locales: Vec<String>,
    pub default_locale: String,

    // Messages
    pub messages_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            port: match std::env::var("PORT") {
                Ok(v) => v.trim().parse::<u16>().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },

            // Locales
            supported_locales: parse_locale_list(
                &std::env::var("SUPPORTED_LOCALES").unwrap_or_else(|_| "en,sw,de".to_string()),
            ),
            default_locale: std::env::var("DEFAULT_LOCALE")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| "en".to_string()),

            // Messages
            messages_dir: std::env::var("MESSAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("messages")),
        })
    }
}

/// Split a comma-separated locale list, dropping blank entries.
fn parse_locale_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
