//! Configuration management for fdbk.
//!
//! Loads configuration from ${FDBK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for fdbk configuration and data directories.
    //!
    //! FDBK_HOME resolution order:
    //! 1. FDBK_HOME environment variable (if set)
    //! 2. ~/.config/fdbk (default)

    use std::path::PathBuf;

    /// Returns the fdbk home directory.
    pub fn fdbk_home() -> PathBuf {
        if let Ok(home) = std::env::var("FDBK_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".fdbk"),
            |h| h.join(".config").join("fdbk"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        fdbk_home().join("config.toml")
    }

    /// Returns the path of the persisted auth session.
    pub fn session_path() -> PathBuf {
        fdbk_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        fdbk_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log filter used when `FDBK_LOG` is unset.
    pub log_level: String,

    /// Firebase project settings.
    pub firebase: FirebaseConfig,
}

impl Config {
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            firebase: FirebaseConfig::default(),
        }
    }
}

/// Firebase project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Web API key (`FDBK_FIREBASE_API_KEY` as fallback).
    pub api_key: Option<String>,
    /// Project id (`FDBK_FIREBASE_PROJECT_ID` as fallback).
    pub project_id: Option<String>,
    /// Firestore collection with the feedback documents.
    pub collection: String,
    pub auth_base_url: Option<String>,
    pub token_base_url: Option<String>,
    pub firestore_base_url: Option<String>,
}

impl FirebaseConfig {
    pub const DEFAULT_COLLECTION: &str = "feedbacks";
    pub const DEFAULT_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
    pub const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com";
    pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

    /// Resolves the API key with precedence: config > env.
    ///
    /// # Errors
    /// Returns an error if neither source provides a key.
    pub fn effective_api_key(&self) -> Result<String> {
        resolve_setting(self.api_key.as_deref(), "FDBK_FIREBASE_API_KEY", "api_key")
    }

    /// Resolves the project id with precedence: config > env.
    ///
    /// # Errors
    /// Returns an error if neither source provides a project id.
    pub fn effective_project_id(&self) -> Result<String> {
        resolve_setting(
            self.project_id.as_deref(),
            "FDBK_FIREBASE_PROJECT_ID",
            "project_id",
        )
    }

    /// # Errors
    /// Returns an error if the configured URL is malformed.
    pub fn effective_auth_base_url(&self) -> Result<String> {
        resolve_base_url(
            self.auth_base_url.as_deref(),
            "FDBK_AUTH_BASE_URL",
            Self::DEFAULT_AUTH_BASE_URL,
        )
    }

    /// # Errors
    /// Returns an error if the configured URL is malformed.
    pub fn effective_token_base_url(&self) -> Result<String> {
        resolve_base_url(
            self.token_base_url.as_deref(),
            "FDBK_TOKEN_BASE_URL",
            Self::DEFAULT_TOKEN_BASE_URL,
        )
    }

    /// # Errors
    /// Returns an error if the configured URL is malformed.
    pub fn effective_firestore_base_url(&self) -> Result<String> {
        resolve_base_url(
            self.firestore_base_url.as_deref(),
            "FDBK_FIRESTORE_BASE_URL",
            Self::DEFAULT_FIRESTORE_BASE_URL,
        )
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            collection: Self::DEFAULT_COLLECTION.to_string(),
            auth_base_url: None,
            token_base_url: None,
            firestore_base_url: None,
        }
    }
}

/// Resolves a required setting with precedence: config > env.
fn resolve_setting(config_value: Option<&str>, env_var: &str, key: &str) -> Result<String> {
    if let Some(value) = config_value {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .with_context(|| format!("Missing Firebase setting. Set {env_var} or {key} in [firebase]."))
}

/// Resolves a base URL with precedence: env > config > default.
///
/// Trailing slashes are dropped so callers can append paths directly.
fn resolve_base_url(config_value: Option<&str>, env_var: &str, default_url: &str) -> Result<String> {
    let chosen = std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            config_value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        });

    match chosen {
        Some(url) => {
            url::Url::parse(&url).with_context(|| format!("Invalid base URL: {url}"))?;
            Ok(url.trim_end_matches('/').to_string())
        }
        None => Ok(default_url.to_string()),
    }
}
