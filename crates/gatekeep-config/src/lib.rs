//! TOML configuration for Gatekeep.
//!
//! Precedence: CLI flags > env vars > config file > defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Where intercepted navigations are sent. Carries the block metadata as
/// query parameters.
pub const DEFAULT_BLOCK_PAGE_URL: &str = "gatekeep://blocked";

/// Name of the policy state file inside the config directory.
pub const STATE_FILE_NAME: &str = "policy.json";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Resolved configuration for a Gatekeep process.
#[derive(Debug, Clone)]
pub struct GatekeepConfig {
    pub config_dir: PathBuf,
    pub state_path: PathBuf,
    pub block_page_url: String,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub blocking: BlockingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Absolute path of the policy state file.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockingSettings {
    /// Base URL of the interception page.
    pub block_page_url: Option<String>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub state_path: Option<PathBuf>,
}

impl GatekeepConfig {
    /// Load configuration from all sources, applying precedence rules.
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let config_dir = config_dir();
        let settings = load_settings_file(&config_dir.join("config.toml"));

        let state_path = overrides
            .state_path
            .or_else(|| std::env::var("GATEKEEP_STATE_PATH").ok().map(PathBuf::from))
            .or(settings.storage.path)
            .unwrap_or_else(|| config_dir.join(STATE_FILE_NAME));

        let block_page_url = std::env::var("GATEKEEP_BLOCK_PAGE_URL")
            .ok()
            .or(settings.blocking.block_page_url)
            .unwrap_or_else(|| DEFAULT_BLOCK_PAGE_URL.to_string());

        // The block page base must itself be a parseable URL, or every
        // redirect we build from it would be garbage.
        if let Err(e) = url::Url::parse(&block_page_url) {
            return Err(ConfigError::InvalidValue {
                key: "blocking.block_page_url".into(),
                message: e.to_string(),
            });
        }

        Ok(GatekeepConfig {
            config_dir,
            state_path,
            block_page_url,
        })
    }
}

/// Get the Gatekeep config directory path (~/.gatekeep/).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GATEKEEP_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gatekeep")
}

/// Load and parse a TOML settings file, returning defaults on any error.
fn load_settings_file(path: &std::path::Path) -> SettingsFile {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}", path.display(), e);
            SettingsFile::default()
        }),
        Err(_) => SettingsFile::default(),
    }
}
