//! Client configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or `$MOVEMINDS_CONFIG_DIR`) and includes:
//! - The REST API base URL
//! - Request timeout and default page size
//! - Debounce delay for the username availability check
//! - Return/cancel URLs handed to the payment gateway

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{MoveMindsError, Result};

pub const CONFIG_DIR_ENV: &str = "MOVEMINDS_CONFIG_DIR";
pub const API_URL_ENV: &str = "MOVEMINDS_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "api_base_url",
    "request_timeout",
    "page_size",
    "username_check_debounce_ms",
    "payment.return_url",
    "payment.cancel_url",
];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST API, without a trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Items per page for list views (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet period before a username availability check is sent
    #[serde(default = "default_username_debounce")]
    pub username_check_debounce_ms: u64,

    /// Payment gateway redirect targets
    #[serde(default, skip_serializing_if = "PaymentConfig::is_default")]
    pub payment: PaymentConfig,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

fn default_username_debounce() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            username_check_debounce_ms: default_username_debounce(),
            payment: PaymentConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

impl PaymentConfig {
    pub fn is_default(&self) -> bool {
        self.return_url.is_none() && self.cancel_url.is_none()
    }
}

impl Config {
    /// Directory holding `config.yaml` and `session.json`
    pub fn dir() -> Result<PathBuf> {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return Ok(PathBuf::from(dir));
        }
        ProjectDirs::from("lk", "MoveMinds", "moveminds")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                MoveMindsError::Config("could not determine a home directory".to_string())
            })
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            MoveMindsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            MoveMindsError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// API base URL from the environment or the config file
    pub fn api_base_url(&self) -> String {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return url.trim_end_matches('/').to_string();
        }
        self.api_base_url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn username_debounce(&self) -> Duration {
        Duration::from_millis(self.username_check_debounce_ms)
    }

    /// Read a single value by its dotted key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_base_url" => Ok(self.api_base_url.clone()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "page_size" => Ok(self.page_size.to_string()),
            "username_check_debounce_ms" => Ok(self.username_check_debounce_ms.to_string()),
            "payment.return_url" => Ok(self.payment.return_url.clone().unwrap_or_default()),
            "payment.cancel_url" => Ok(self.payment.cancel_url.clone().unwrap_or_default()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Update a single value by its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_base_url" => {
                url::Url::parse(value).map_err(|e| {
                    MoveMindsError::Config(format!("invalid URL '{value}': {e}"))
                })?;
                self.api_base_url = value.trim_end_matches('/').to_string();
            }
            "request_timeout" => self.request_timeout = parse_number(key, value)?,
            "page_size" => {
                let size: usize = parse_number(key, value)?;
                if size == 0 {
                    return Err(MoveMindsError::Config(
                        "page_size must be at least 1".to_string(),
                    ));
                }
                self.page_size = size;
            }
            "username_check_debounce_ms" => {
                self.username_check_debounce_ms = parse_number(key, value)?
            }
            "payment.return_url" => self.payment.return_url = Some(value.to_string()),
            "payment.cancel_url" => self.payment.cancel_url = Some(value.to_string()),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> MoveMindsError {
    MoveMindsError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| MoveMindsError::Config(format!("'{key}' expects a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.username_debounce(), Duration::from_millis(500));
        assert!(config.payment.is_default());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml_ng::from_str("page_size: 25\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.request_timeout, 30);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.set("api_base_url", "https://api.moveminds.lk/api/").unwrap();
        config.set("payment.return_url", "https://moveminds.lk/paid").unwrap();

        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: Config = serde_yaml_ng::from_str(&yaml).unwrap();

        assert_eq!(parsed.api_base_url, "https://api.moveminds.lk/api");
        assert_eq!(
            parsed.payment.return_url.as_deref(),
            Some("https://moveminds.lk/paid")
        );
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("page_size", "0").is_err());
        assert!(config.set("page_size", "ten").is_err());
        assert!(config.set("api_base_url", "not a url").is_err());
        assert!(config.set("theme", "dark").is_err());
    }

    #[test]
    fn test_get_known_keys() {
        let config = Config::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_ok(), "key {key} should be readable");
        }
        assert_eq!(config.get("request_timeout").unwrap(), "30");
    }
}
