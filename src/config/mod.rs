//! Configuration management for sitemap-architect
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Location the config was loaded from (internal, not user-editable)
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_bind")]
    pub bind: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Remote fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User agent string sent with every request
    #[serde(default = "default_fetch_user_agent")]
    pub user_agent: String,

    /// Timeout for sitemap documents, in seconds
    #[serde(default = "default_sitemap_timeout")]
    pub sitemap_timeout_secs: u64,

    /// Timeout for robots.txt, in seconds
    #[serde(default = "default_robots_timeout")]
    pub robots_timeout_secs: u64,

    /// Timeout for each well-known path probe during discovery (milliseconds)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Timeout for each well-known path probe during discover-all (milliseconds)
    #[serde(default = "default_discover_probe_timeout_ms")]
    pub discover_probe_timeout_ms: u64,

    /// Bytes read from a discover-all candidate before sniffing it
    #[serde(default = "default_probe_max_bytes")]
    pub probe_max_bytes: usize,

    /// Child sitemaps fetched per sitemap index; the rest are ignored
    #[serde(default = "default_max_child_sitemaps")]
    pub max_child_sitemaps: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_server_bind(),
            port: default_server_port(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_fetch_user_agent(),
            sitemap_timeout_secs: default_sitemap_timeout(),
            robots_timeout_secs: default_robots_timeout(),
            probe_timeout_ms: default_probe_timeout_ms(),
            discover_probe_timeout_ms: default_discover_probe_timeout_ms(),
            probe_max_bytes: default_probe_max_bytes(),
            max_child_sitemaps: default_max_child_sitemaps(),
        }
    }
}

impl FetchConfig {
    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_secs(self.sitemap_timeout_secs)
    }

    pub fn robots_timeout(&self) -> Duration {
        Duration::from_secs(self.robots_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn discover_probe_timeout(&self) -> Duration {
        Duration::from_millis(self.discover_probe_timeout_ms)
    }
}

impl Config {
    /// Get the default base directory (~/.sitemap-architect)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sitemap-architect")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.config_file = config_path.to_path_buf();

        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, falling back to built-in defaults
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            debug!("No config file found, using defaults");
            Ok(Config {
                config_file: path,
                ..Config::default()
            })
        }
    }

    /// Save configuration to `config_file`
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.config_file, content)?;
        info!("Saved config to {:?}", self.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let fetch = &self.fetch;

        if fetch.user_agent.trim().is_empty() {
            return Err(Error::Config("fetch.user_agent must not be empty".to_string()));
        }

        if fetch.sitemap_timeout_secs == 0
            || fetch.robots_timeout_secs == 0
            || fetch.probe_timeout_ms == 0
            || fetch.discover_probe_timeout_ms == 0
        {
            return Err(Error::Config("fetch timeouts must be positive".to_string()));
        }

        if fetch.probe_max_bytes == 0 {
            return Err(Error::Config(
                "fetch.probe_max_bytes must be positive".to_string(),
            ));
        }

        if fetch.max_child_sitemaps == 0 {
            return Err(Error::Config(
                "fetch.max_child_sitemaps must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.max_child_sitemaps, 15);
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.fetch.sitemap_timeout(), Duration::from_secs(10));
        assert_eq!(config.fetch.probe_timeout(), Duration::from_millis(3000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.config_file = tmp.path().join("config.toml");
        config.fetch.max_child_sitemaps = 4;
        config.server.port = 8080;

        config.save().unwrap();
        assert!(config.config_file.exists());

        let loaded = Config::load(&config.config_file).unwrap();
        assert_eq!(loaded.fetch.max_child_sitemaps, 4);
        assert_eq!(loaded.server.port, 8080);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[fetch]\nrobots_timeout_secs = 2\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.fetch.robots_timeout_secs, 2);
        assert_eq!(loaded.fetch.sitemap_timeout_secs, 10);
        assert_eq!(loaded.server.bind, "0.0.0.0");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.fetch.max_child_sitemaps = 0;
        assert!(config.validate().is_err());

        config.fetch.max_child_sitemaps = 15;
        config.fetch.probe_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.fetch.probe_timeout_ms = 3000;
        config.fetch.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
