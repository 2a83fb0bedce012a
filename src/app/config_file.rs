//! Configuration file loading and parsing
//!
//! Loads configuration from `~/.config/shelfview/config.toml`

use std::fs;
use std::path::PathBuf;

use log::warn;
use serde::Deserialize;

use crate::core::{DefaultTabs, SidebarTab};

/// Main configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// General settings
    pub general: GeneralConfig,
    /// Sidebar defaults
    pub sidebar: SidebarConfig,
    /// Performance settings
    pub performance: PerformanceConfig,
}

/// General application settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base URL of the authoring API
    pub base_url: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
        }
    }
}

/// Default tab per panel kind, as wire strings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    /// Default tab for component info panels
    pub component_tab: String,
    /// Default tab for unit, section and subsection info panels
    pub unit_tab: String,
    /// Default tab for collection info panels
    pub collection_tab: String,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            component_tab: "preview".to_string(),
            unit_tab: "preview".to_string(),
            collection_tab: "manage".to_string(),
        }
    }
}

impl SidebarConfig {
    /// Resolve the configured names. Unknown names fall back to the
    /// built-in default for that panel kind with a warning.
    pub fn default_tabs(&self) -> DefaultTabs {
        let fallback = DefaultTabs::default();
        DefaultTabs {
            component: parse_tab(&self.component_tab, fallback.component),
            unit: parse_tab(&self.unit_tab, fallback.unit),
            collection: parse_tab(&self.collection_tab, fallback.collection),
        }
    }
}

fn parse_tab(value: &str, fallback: SidebarTab) -> SidebarTab {
    match SidebarTab::parse(value) {
        Some(tab) => tab,
        None => {
            warn!(
                "unknown tab name {:?} in config, using {}",
                value,
                fallback.as_str()
            );
            fallback
        }
    }
}

/// Performance-related settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Event poll interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 60,
        }
    }
}

impl ConfigFile {
    /// Get the config directory path (~/.config/shelfview)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shelfview"))
    }

    /// Get the config file path (~/.config/shelfview/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| {
                if path.exists() {
                    fs::read_to_string(&path).ok()
                } else {
                    None
                }
            })
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Load configuration from a specific path (for testing)
    pub fn load_from(path: &PathBuf) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }
}
