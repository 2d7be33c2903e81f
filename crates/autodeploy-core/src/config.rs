//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the backend base URL, the request timeout and the last email
//! used to log in.
//!
//! Configuration is stored at `~/.config/autodeploy/config.json`. The base URL
//! can be overridden with `AUTODEPLOY_API_BASE_URL`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "autodeploy";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured base URL
pub const API_BASE_URL_ENV: &str = "AUTODEPLOY_API_BASE_URL";

/// Backend used when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session storage
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Effective base URL: environment, then config file, then default.
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(API_BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, env_override: Option<String>) -> String {
        let url = env_override
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        url.trim().trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Config with an explicit base URL in place of the file value
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(base_url.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_precedence() {
        let config = Config::default();
        assert_eq!(config.resolve_base_url(None), DEFAULT_API_BASE_URL);

        let config = Config::with_base_url("https://deploy.example.com/api/");
        assert_eq!(config.resolve_base_url(None), "https://deploy.example.com/api");
        assert_eq!(
            config.resolve_base_url(Some("http://127.0.0.1:9000".to_string())),
            "http://127.0.0.1:9000"
        );
        // Blank override falls through to the file value
        assert_eq!(
            config.resolve_base_url(Some("  ".to_string())),
            "https://deploy.example.com/api"
        );
    }

    #[test]
    fn test_request_timeout_default() {
        assert_eq!(Config::default().request_timeout(), Duration::from_secs(30));
        let config = Config {
            request_timeout_secs: Some(5),
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_config_round_trips_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"last_email":"a@x.com"}"#).unwrap();
        assert_eq!(config.last_email.as_deref(), Some("a@x.com"));
        assert!(config.api_base_url.is_none());
    }
}
