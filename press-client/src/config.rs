use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PressError, Result};

/// Console and client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API root, including the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout for JSON calls in seconds (0 disables)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Number of images resolved concurrently during pre-fetch
    #[serde(default = "default_prefetch_batch_size")]
    pub prefetch_batch_size: usize,

    /// Pause between pre-fetch batches in milliseconds
    #[serde(default = "default_prefetch_pause_ms")]
    pub prefetch_pause_ms: u64,

    /// Default post count for Instagram user scrapes
    #[serde(default = "default_scrape_limit")]
    pub scrape_limit: u32,

    /// Default post count for bulk imports
    #[serde(default = "default_bulk_import_limit")]
    pub bulk_import_limit: u32,

    /// Posts shown by the list commands
    #[serde(default = "default_post_list_limit")]
    pub post_list_limit: u32,

    /// Posts returned by a search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_prefetch_batch_size() -> usize {
    3
}

fn default_prefetch_pause_ms() -> u64 {
    500
}

fn default_scrape_limit() -> u32 {
    20
}

fn default_bulk_import_limit() -> u32 {
    10
}

fn default_post_list_limit() -> u32 {
    20
}

fn default_search_limit() -> u32 {
    50
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            prefetch_batch_size: default_prefetch_batch_size(),
            prefetch_pause_ms: default_prefetch_pause_ms(),
            scrape_limit: default_scrape_limit(),
            bulk_import_limit: default_bulk_import_limit(),
            post_list_limit: default_post_list_limit(),
            search_limit: default_search_limit(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, returning defaults if it doesn't exist
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path: ~/.config/cli-programs/press.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PressError::ConfigError("home directory not found".into()))?;
        Ok(home.join(".config").join("cli-programs").join("press.toml"))
    }

    /// Request timeout for JSON calls, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Pause between pre-fetch batches
    pub fn prefetch_pause(&self) -> Duration {
        Duration::from_millis(self.prefetch_pause_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.prefetch_batch_size == 0 {
            return Err(PressError::ConfigError(
                "prefetch_batch_size must be at least 1".into(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(PressError::ConfigError(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}
