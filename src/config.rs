//! Settings file parser for `config/settings.json`.
//!
//! Unlike most CLI tools the settings file is mandatory: a missing file at the
//! resolved path is a startup error. Every key is optional, and unknown keys
//! are accepted but logged as potential typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Values read from the settings file.
///
/// Every field is optional; absent values fall through to CLI flags or
/// built-in defaults during planning (see [`crate::plan::plan`]).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Interface language, e.g. `en`.
    pub language: Option<String>,

    /// Edition region, e.g. `US`.
    pub region: Option<String>,

    /// Global cap on emitted records.
    pub max_items: Option<usize>,

    /// Follow each article link to resolve redirects and read `og:image`.
    pub fetch_article_details: Option<bool>,

    pub user_agent: Option<String>,

    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,

    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,

    /// Friendly topic name or hashed topic id.
    pub topic: Option<String>,

    /// Hashed topic id as seen in Google News URLs.
    pub hashed_topic: Option<String>,

    pub query: Option<String>,
}

impl Settings {
    /// Maximum settings file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "language",
        "region",
        "maxItems",
        "fetchArticleDetails",
        "userAgent",
        "dateFrom",
        "dateTo",
        "topic",
        "hashedTopic",
        "query",
    ];

    /// Load settings from a JSON file.
    ///
    /// - Missing file → `Err(ConfigError::NotFound)`
    /// - Empty file → `Ok(Settings::default())`
    /// - Invalid JSON or wrong value types → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading to avoid slurping a huge file.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between metadata and read
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_json(&content)
    }

    /// Parse settings from JSON text. Whitespace-only input yields defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw object first to detect unknown keys
        if let Ok(serde_json::Value::Object(raw)) = serde_json::from_str(content) {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let settings: Settings = serde_json::from_str(content)?;
        tracing::debug!(?settings, "Loaded settings");
        Ok(settings)
    }
}

// ============================================================================
// Tests
// ============================================================================
