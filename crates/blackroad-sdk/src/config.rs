//! SDK Configuration
//!
//! `ClientOptions` is what callers fill in; `ClientConfig` is the resolved,
//! validated form the executor is built from. Resolution never touches the
//! network.

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable consulted when no API key is passed explicitly
pub const API_KEY_ENV: &str = "BLACKROAD_API_KEY";

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.blackroad.io";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Caller-supplied client options; every field falls back to a default
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Bearer credential (falls back to `BLACKROAD_API_KEY`)
    pub api_key: Option<String>,

    /// API base URL (default: https://api.blackroad.io)
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Resolved client configuration. Immutable once built.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Resolve options against the process environment
    pub fn resolve(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::resolve_with(options, |name| std::env::var(name).ok())
    }

    /// Resolve options using `lookup` in place of the process environment
    pub fn resolve_with<F>(options: ClientOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = options
            .api_key
            .and_then(non_empty)
            .or_else(|| lookup(API_KEY_ENV).and_then(non_empty))
            .ok_or(ConfigError::MissingApiKey)?;

        if HeaderValue::from_str(&format!("Bearer {api_key}")).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "api_key".into(),
                message: "contains characters not allowed in an HTTP header".into(),
            });
        }

        let base_url = options
            .base_url
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let timeout_secs = options.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Bearer credential
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: "base_url".into(),
        message,
    };

    let url = reqwest::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key required. Pass api_key or set BLACKROAD_API_KEY")]
    MissingApiKey,

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
