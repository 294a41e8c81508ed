//! Configuration management for the Cortex client.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (CORTEX_*)
//! 2. Config file (config.toml in the Cortex data directory)
//! 3. Default values

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Hardcoded fallback for local development
const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings
    pub api: ApiConfig,

    /// Paths
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL for the Cortex backend
    #[serde(default = "default_api_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base directory for client data (the credential marker lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

// Default value functions
fn default_api_url() -> String {
    std::env::var("CORTEX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "cortex", "cortex") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cortex")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;

        // Environment overrides the config file
        if let Ok(url) = std::env::var("CORTEX_API_URL") {
            config.api.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the default config path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("CORTEX_CONFIG") {
            PathBuf::from(path)
        } else {
            default_data_dir().join("config.toml")
        }
    }

    /// Path of the credential marker file.
    pub fn token_path(&self) -> PathBuf {
        self.paths.data_dir.join("token")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.paths.data_dir)
            .map_err(|e| Error::Config(format!("Failed to create data directory: {e}")))?;
        Ok(())
    }
}
