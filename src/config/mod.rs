//! Configuration module for shelfr
//!
//! Holds the storefront backend URL and the browsing defaults. The file
//! lives in the user's config directory as TOML; a missing file triggers
//! the interactive setup on first run.

mod setup;

pub use setup::first_time_setup;

use crate::coordinator::CoordinatorOptions;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Debounce window bounds; values outside are clamped, not rejected
pub const MIN_DEBOUNCE_MS: u64 = 150;
pub const MAX_DEBOUNCE_MS: u64 = 300;

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ShelfrConfig {
    /// Base URL of the catalog backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Results per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Trailing debounce for search-as-you-type, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request HTTP timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Lifetime of cached suggestion lookups, in seconds
    #[serde(default = "default_suggest_ttl_secs")]
    pub suggest_ttl_secs: u64,

    /// Cap on cached suggestion lookups
    #[serde(default = "default_suggest_capacity")]
    pub suggest_capacity: u64,

    /// How many recent searches to keep
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

const fn default_page_size() -> u32 {
    crate::query::DEFAULT_PAGE_SIZE
}

const fn default_debounce_ms() -> u64 {
    250
}

const fn default_request_timeout_secs() -> u64 {
    10
}

const fn default_suggest_ttl_secs() -> u64 {
    300
}

const fn default_suggest_capacity() -> u64 {
    1000
}

const fn default_history_limit() -> usize {
    crate::history::DEFAULT_LIMIT
}

impl Default for ShelfrConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            suggest_ttl_secs: default_suggest_ttl_secs(),
            suggest_capacity: default_suggest_capacity(),
            history_limit: default_history_limit(),
            quiet: false,
        }
    }
}

impl ShelfrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("shelfr").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let settings = Config::builder()
            .add_source(File::from(config_path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(&config_path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load()
        } else {
            first_time_setup()
        }
    }

    /// Debounce window, clamped into the supported range
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Coordinator tuning derived from this config
    #[must_use]
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            debounce: self.debounce(),
            suggest_ttl: Duration::from_secs(self.suggest_ttl_secs),
            suggest_capacity: self.suggest_capacity,
            ..CoordinatorOptions::default()
        }
    }

    /// Update one field by its config-file key, for `shelfr config set`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or an unparseable value.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "backend_url" => self.backend_url = value.to_string(),
            "page_size" => self.page_size = parse_field(key, value)?,
            "debounce_ms" => self.debounce_ms = parse_field(key, value)?,
            "request_timeout_secs" => self.request_timeout_secs = parse_field(key, value)?,
            "suggest_ttl_secs" => self.suggest_ttl_secs = parse_field(key, value)?,
            "suggest_capacity" => self.suggest_capacity = parse_field(key, value)?,
            "history_limit" => self.history_limit = parse_field(key, value)?,
            "quiet" => self.quiet = parse_field(key, value)?,
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown config key '{key}'"
                )));
            }
        }
        Ok(())
    }

    /// Read one field by its config-file key, for `shelfr config get`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key.
    pub fn get_value(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "backend_url" => self.backend_url.clone(),
            "page_size" => self.page_size.to_string(),
            "debounce_ms" => self.debounce_ms.to_string(),
            "request_timeout_secs" => self.request_timeout_secs.to_string(),
            "suggest_ttl_secs" => self.suggest_ttl_secs.to_string(),
            "suggest_capacity" => self.suggest_capacity.to_string(),
            "history_limit" => self.history_limit.to_string(),
            "quiet" => self.quiet.to_string(),
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown config key '{key}'"
                )));
            }
        };
        Ok(value)
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid value '{value}' for '{key}'")))
}
