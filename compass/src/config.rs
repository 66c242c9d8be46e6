//! Configuration loading for compass
//!
//! Configuration is loaded from:
//! 1. Environment variable COMPASS_API (search base URL)
//! 2. Environment variable COMPASS_CONFIG_PATH
//! 3. ~/.compass/config.toml
//! 4. Default values

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Search API configuration
    #[serde(default)]
    pub search: SearchApiConfig,
    /// Summary and suggestion services
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    /// Interaction timing and scroll thresholds
    #[serde(default)]
    pub ui: UiConfig,
}

/// Search API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchApiConfig {
    /// Base URL of the search service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Summary lookup and suggestion services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Summary endpoint; the title is appended as a path segment
    #[serde(default = "default_summary_url")]
    pub summary_url: String,
    /// Opensearch endpoint for suggestion titles
    #[serde(default = "default_suggest_url")]
    pub suggest_url: String,
    /// Maximum number of suggestion titles requested
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Interaction timing and scroll thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Autocomplete debounce in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Look-ahead (px) added to the viewport bottom by the scroll check
    #[serde(default = "default_scroll_look_ahead")]
    pub scroll_look_ahead: f64,
    /// Margin (px) around the viewport for sentinel visibility
    #[serde(default = "default_sentinel_margin")]
    pub sentinel_margin: f64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "compass/0.1".to_string()
}

fn default_summary_url() -> String {
    "https://en.wikipedia.org/api/rest_v1/page/summary".to_string()
}

fn default_suggest_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_suggest_limit() -> usize {
    8
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_scroll_look_ahead() -> f64 {
    1500.0
}

fn default_sentinel_margin() -> f64 {
    1000.0
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            summary_url: default_summary_url(),
            suggest_url: default_suggest_url(),
            suggest_limit: default_suggest_limit(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            scroll_look_ahead: default_scroll_look_ahead(),
            sentinel_margin: default_sentinel_margin(),
        }
    }
}

impl UiConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_path() {
            Some(path) if path.exists() => Self::load_from_path(&path)?,
            Some(_) => {
                tracing::info!("Config file not found, using defaults");
                Self::default()
            }
            None => {
                tracing::info!("No config path specified, using defaults");
                Self::default()
            }
        };

        // Search base URL from environment (highest priority)
        if let Ok(url) = std::env::var("COMPASS_API") {
            if !url.trim().is_empty() {
                config.search.base_url = url;
            }
        }

        Ok(config)
    }

    /// Load from a specific TOML file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find the configuration file path
    fn find_config_path() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(path) = std::env::var("COMPASS_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        // 2. Check ~/.compass/config.toml
        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".compass").join("config.toml"));
        }

        None
    }
}
