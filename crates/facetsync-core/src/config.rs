//! Configuration management for Facetsync.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.
//! It only supplies defaults for widgets built from JSON configs; connectors
//! built in code take their settings directly.

use crate::connectors::menu::{DEFAULT_LIMIT_MAX, DEFAULT_LIMIT_MIN};
use crate::error::{FacetSyncError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for Facetsync.
///
/// ## Example Configuration File (facetsync.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [menu]
/// limit_min = 10
/// limit_max = 20
/// show_more = false
/// with_search_box = false
///
/// [pagination]
/// default_page = 1
///
/// [output]
/// pretty = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Defaults for menu widgets
    pub menu: MenuConfig,

    /// Defaults for pagination widgets
    pub pagination: PaginationConfig,

    /// Output formatting
    pub output: OutputConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

/// Menu widget defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Items shown while collapsed
    pub limit_min: u32,

    /// Items shown once expanded
    pub limit_max: u32,

    /// Start expanded
    pub show_more: bool,

    /// Allow searching inside facet values
    pub with_search_box: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            limit_min: DEFAULT_LIMIT_MIN,
            limit_max: DEFAULT_LIMIT_MAX,
            show_more: false,
            with_search_box: false,
        }
    }
}

/// Pagination widget defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page shown when neither the state nor the widget sets one
    pub default_page: Option<i64>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { pretty: true }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| FacetSyncError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| FacetSyncError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "facetsync").ok_or_else(|| FacetSyncError::ConfigError {
                reason: "Could not determine config directory".to_string(),
            })?;

        Ok(dirs.config_dir().join("facetsync.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.menu.limit_min > self.menu.limit_max {
            return Err(FacetSyncError::ConfigError {
                reason: format!(
                    "menu.limit_min ({}) exceeds menu.limit_max ({})",
                    self.menu.limit_min, self.menu.limit_max
                ),
            });
        }
        Ok(())
    }
}
