//! Configuration file parser for ~/.config/feedsift/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde and reported with a warning.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// How a feed URL is matched to an adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Hard-wired substring checks in [`crate::feed::get_parser`].
    #[default]
    Static,
    /// Ask every registered adapter's `can_parse` in registration order.
    Discovery,
}

/// What the traversal does when one entry's embedded HTML is malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemErrorPolicy {
    /// Log the entry and leave it out of the channel.
    #[default]
    Skip,
    /// Fail the whole parse.
    Abort,
}

/// HTTP settings for the single feed request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Upper bound on the response body, in bytes.
    pub max_feed_size: usize,
    pub user_agent: String,
    /// Permit localhost and private-range hosts as fetch targets.
    pub allow_private_hosts: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_feed_size: 10 * 1024 * 1024,
            user_agent: concat!("feedsift/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_hosts: false,
        }
    }
}

/// Top-level configuration.
///
/// Every field has a default, so any subset of keys can be specified.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selection: SelectionMode,
    pub on_item_error: ItemErrorPolicy,
    pub fetch: FetchConfig,
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["selection", "on_item_error", "fetch"];
    const KNOWN_FETCH_KEYS: [&'static str; 4] = [
        "timeout_secs",
        "max_feed_size",
        "user_agent",
        "allow_private_hosts",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text. Blank input yields the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw, &Self::KNOWN_KEYS, "");
            if let Some(toml::Value::Table(fetch)) = raw.get("fetch") {
                warn_unknown_keys(fetch, &Self::KNOWN_FETCH_KEYS, "fetch.");
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}

fn warn_unknown_keys(table: &toml::Table, known: &[&str], prefix: &str) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            tracing::warn!(key = %format!("{prefix}{key}"), "Unknown key in config file, ignoring");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
