//! Configuration management for blackroad.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Command-line flags (`--api-url`, `--timeout`)
//! 2. Environment variables (BLACKROAD_API_KEY, BLACKROAD_API_URL)
//! 3. Config file (~/.blackroad/config.toml, or $BLACKROAD_CONFIG)
//! 4. Default values

use anyhow::{Context, Result};
use blackroad_sdk::{API_KEY_ENV, BlackRoadClient, ClientOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Overrides the config file location
pub const CONFIG_ENV: &str = "BLACKROAD_CONFIG";

/// Overrides the API base URL
pub const API_URL_ENV: &str = "BLACKROAD_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// BlackRoad API settings
    pub api: ApiConfig,

    /// Defaults for `agent run`
    pub agent: AgentConfig,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; the SDK default applies when unset
    pub url: Option<String>,

    /// API key for authentication
    pub api_key: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent name; defaults to `<hostname>-agent`
    pub name: Option<String>,

    /// Capabilities advertised on registration
    pub capabilities: Vec<String>,

    /// Seconds between heartbeats
    pub heartbeat_interval_secs: u64,
}

fn default_heartbeat_interval() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: None,
            capabilities: Vec::new(),
            heartbeat_interval_secs: default_heartbeat_interval(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path())?;
        Ok(config.with_env(|name| std::env::var(name).ok()))
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.api.api_key = Some(key);
        }
        if let Some(url) = non_empty(API_URL_ENV) {
            self.api.url = Some(url);
        }
        self
    }

    /// Apply command-line flag overrides.
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if api_url.is_some() {
            self.api.url = api_url;
        }
        if timeout_secs.is_some() {
            self.api.timeout_secs = timeout_secs;
        }
        self
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            PathBuf::from(path)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".blackroad")
                .join("config.toml")
        }
    }

    /// SDK options for the resolved settings
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            api_key: self.api.api_key.clone(),
            base_url: self.api.url.clone(),
            timeout_secs: self.api.timeout_secs,
        }
    }

    /// Build an SDK client. Fails before any request if no API key is known.
    pub fn client(&self) -> Result<BlackRoadClient> {
        BlackRoadClient::new(self.client_options()).with_context(|| {
            format!(
                "Failed to create BlackRoad client. Set {API_KEY_ENV} or add api_key to {}",
                Self::config_path().display()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.api.url.is_none());
        assert!(config.api.api_key.is_none());
        assert!(config.api.timeout_secs.is_none());
        assert!(config.agent.name.is_none());
        assert_eq!(config.agent.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");

        let config = Config::load_from(&temp.path().join("config.toml")).expect("defaults");
        assert!(config.api.api_key.is_none());
        assert_eq!(config.agent.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
url = "http://localhost:8787"
api_key = "file-key"
timeout_secs = 5

[agent]
name = "builder"
capabilities = ["rust", "deploy"]
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(config.api.url.as_deref(), Some("http://localhost:8787"));
        assert_eq!(config.api.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.api.timeout_secs, Some(5));
        assert_eq!(config.agent.name.as_deref(), Some("builder"));
        assert_eq!(config.agent.capabilities, vec!["rust", "deploy"]);
        // Unset keys inside a present table keep their defaults
        assert_eq!(config.agent.heartbeat_interval_secs, 30);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[api\nurl = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.api.api_key = Some("file-key".into());
        config.api.url = Some("http://file".into());

        let config = config.with_env(env(&[
            (API_KEY_ENV, "env-key"),
            (API_URL_ENV, "http://env"),
        ]));
        assert_eq!(config.api.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.api.url.as_deref(), Some("http://env"));
    }

    #[test]
    fn test_empty_env_does_not_override() {
        let mut config = Config::default();
        config.api.api_key = Some("file-key".into());

        let config = config.with_env(env(&[(API_KEY_ENV, "  ")]));
        assert_eq!(config.api.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_flags_override_env() {
        let config = Config::default()
            .with_env(env(&[(API_URL_ENV, "http://env")]))
            .with_overrides(Some("http://flag".into()), Some(9));
        assert_eq!(config.api.url.as_deref(), Some("http://flag"));
        assert_eq!(config.api.timeout_secs, Some(9));

        let config = config.with_overrides(None, None);
        assert_eq!(config.api.url.as_deref(), Some("http://flag"));
    }

    #[test]
    fn test_client_options_mapping() {
        let config = Config::default()
            .with_env(env(&[(API_KEY_ENV, "k")]))
            .with_overrides(Some("http://localhost:9000/".into()), Some(3));
        let options = config.client_options();
        assert_eq!(options.api_key.as_deref(), Some("k"));
        assert_eq!(options.base_url.as_deref(), Some("http://localhost:9000/"));
        assert_eq!(options.timeout_secs, Some(3));

        let client = config.client().expect("client");
        assert_eq!(client.config().base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.api.api_key = Some("super-secret".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
