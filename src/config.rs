use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::limits::DEFAULT_UPSERT_CHUNK_SIZE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tvmaze: TvMazeConfig,

    pub fanart: FanArtConfig,

    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// JSON snapshot the CLI upserts into.
    pub store_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            store_path: "data/catalog.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TvMazeConfig {
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,

    /// Ask TVMaze to include specials in episode lists.
    pub include_specials: bool,
}

impl Default for TvMazeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tvmaze.com".to_string(),
            request_timeout_seconds: 30,
            include_specials: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FanArtConfig {
    pub base_url: String,

    pub api_key: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for FanArtConfig {
    fn default() -> Self {
        Self {
            base_url: "https://webservice.fanart.tv/v3".to_string(),
            api_key: String::new(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Rows per upsert call.
    pub upsert_chunk_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            upsert_chunk_size: DEFAULT_UPSERT_CHUNK_SIZE,
        }
    }
}

/// File name looked up in each search directory and written by `init`.
pub const CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Loads the first config file on the search path, falling back to
    /// defaults when there is none.
    pub fn load() -> Result<Self> {
        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "Loading config");
                Self::load_from_path(&path)
            }
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Working directory first, then the platform config dir, then
    /// `~/.lundflix`.
    fn search_paths() -> Vec<PathBuf> {
        std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(dirs::config_dir().map(|dir| dir.join("lundflix").join(CONFIG_FILE)))
            .chain(dirs::home_dir().map(|dir| dir.join(".lundflix").join(CONFIG_FILE)))
            .collect()
    }

    /// Writes the default config to `path` unless something is already
    /// there. Returns whether a file was written.
    pub fn create_default_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to_path(path)?;
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.tvmaze.base_url).context("Invalid TVMaze base URL")?;
        url::Url::parse(&self.fanart.base_url).context("Invalid FanArt base URL")?;

        if self.sync.upsert_chunk_size == 0 {
            anyhow::bail!("sync.upsert_chunk_size must be > 0");
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "Unknown log format '{}', expected \"pretty\" or \"json\"",
                self.general.log_format
            );
        }

        Ok(())
    }
}
