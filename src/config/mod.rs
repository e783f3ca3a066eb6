//! Configuration module for ChemVis-RS
//!
//! This module handles the persistent application configuration:
//! - Where the dataset REST service lives and how to talk to it
//! - Display preferences for the UI
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.chemvis.chemvis-rs/`
//! - **macOS**: `~/Library/Application Support/dev.chemvis.chemvis-rs/`
//! - **Windows**: `%APPDATA%\dev.chemvis.chemvis-rs\`
//!
//! # Files
//!
//! - `config.toml` - [`AppConfig`]
//! - `logs/` - Daily rolling log files
//!
//! # Environment
//!
//! `CHEMVIS_API_BASE` overrides `api.base_url` for the current run. The
//! app saves with [`AppConfig::save_preferences`], so the override is never
//! written back.
//!
//! # Example
//!
//! ```ignore
//! use chemvis_rs::config::AppConfig;
//!
//! let mut config = AppConfig::load_or_default();
//! config.ui.dark_mode = false;
//! config.save()?;
//! ```

use crate::error::{ChemVisError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.chemvis.chemvis-rs";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding [`ApiConfig::base_url`]
pub const API_BASE_ENV: &str = "CHEMVIS_API_BASE";

/// Default REST service location
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Default number of rows requested per dataset
pub const DEFAULT_ROWS_PAGE_SIZE: usize = 100_000;

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        ChemVisError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .map_err(ChemVisError::from)
            .context("Failed to create app data directory")?;
    }

    Ok(dir)
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Directory for log files
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join("logs"))
}

// ==================== API ====================

/// How to reach the dataset REST service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto
    #[serde(default = "default_api_base")]
    pub base_url: String,

    /// `page_size` sent with rows requests
    #[serde(default = "default_rows_page_size")]
    pub rows_page_size: usize,

    /// Per-request timeout; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_rows_page_size() -> usize {
    DEFAULT_ROWS_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            rows_page_size: default_rows_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ==================== UI Preferences ====================

/// UI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Font scale factor
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Show chart legends
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// Open a dataset right after it was uploaded
    #[serde(default = "default_true")]
    pub select_after_upload: bool,
}

fn default_true() -> bool {
    true
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_scale: default_font_scale(),
            show_legend: true,
            select_after_upload: true,
        }
    }
}

// ==================== App Config ====================

/// Persistent application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ui: UiPreferences,
}

impl AppConfig {
    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(ChemVisError::from)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ChemVisError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Write the config to `path`
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| {
            ChemVisError::Serialization(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)
            .map_err(ChemVisError::from)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            ChemVisError::Config("Could not determine config path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load config, returning defaults on any error, then apply the
    /// environment override
    pub fn load_or_default() -> Self {
        let mut config = Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        });
        config.apply_env_overrides();
        config
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(CONFIG_FILE))
    }

    /// Save only the UI preferences, keeping the stored API section.
    ///
    /// Used on exit so a `CHEMVIS_API_BASE` override never reaches the file.
    pub fn save_preferences(&self) -> Result<()> {
        let mut stored = Self::load().unwrap_or_else(|e| {
            tracing::warn!("Replacing unreadable config: {}", e);
            Self::default()
        });
        stored.ui = self.ui.clone();
        stored.save()
    }

    /// Replace `api.base_url` with `CHEMVIS_API_BASE` when it is set and non-empty.
    ///
    /// Returns whether an override was applied.
    pub fn apply_env_overrides(&mut self) -> bool {
        match std::env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                tracing::info!("Using {} from {}", base.trim(), API_BASE_ENV);
                self.api.base_url = base.trim().to_string();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.api.rows_page_size, 100_000);
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.ui.select_after_upload);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let api = ApiConfig {
            request_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert_eq!(api.request_timeout(), None);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.api.base_url = "https://plant.example/api".to_string();
        config.ui.dark_mode = false;
        config.ui.font_scale = 1.25;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[api]\nrows_page_size = 500\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api.rows_page_size, 500);
        assert_eq!(loaded.api.base_url, DEFAULT_API_BASE);
        assert_eq!(loaded.ui, UiPreferences::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, AppConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        match AppConfig::load_from(&path) {
            Err(ChemVisError::Config(msg)) => assert!(msg.starts_with("Failed to parse config")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(CONFIG_FILE);

        let err = AppConfig::default().save_to(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to write config"));
        match err {
            ChemVisError::WithContext { source, .. } => {
                assert!(matches!(*source, ChemVisError::Io(_)))
            }
            other => panic!("expected io error, got {:?}", other),
        }

        // A directory where the file should be
        match AppConfig::load_from(dir.path()) {
            Err(ChemVisError::WithContext { source, .. }) => {
                assert!(matches!(*source, ChemVisError::Io(_)))
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var(API_BASE_ENV, " http://10.0.0.5:8000/api ");
        let mut config = AppConfig::default();
        assert!(config.apply_env_overrides());
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");

        std::env::set_var(API_BASE_ENV, "");
        let mut config = AppConfig::default();
        assert!(!config.apply_env_overrides());
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);

        std::env::remove_var(API_BASE_ENV);
    }
}
