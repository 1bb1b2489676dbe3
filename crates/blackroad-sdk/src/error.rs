//! SDK Error Types
//!
//! Every failure surfaces to the caller as one of these kinds. The SDK does
//! no local recovery or retry; the predicates below let callers build their
//! own retry policy.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

/// SDK Result type alias
pub type BlackRoadResult<T> = Result<T, BlackRoadError>;

/// SDK errors
#[derive(Debug, Error)]
pub enum BlackRoadError {
    /// Missing or invalid configuration, raised before any request is sent
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Non-2xx response from the API
    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// No response within the configured timeout
    #[error("request timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Response body was not the JSON shape the SDK expects
    #[error("decode error: {message}")]
    Decode { message: String },

    /// Network failure before an HTTP response arrived
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Caller-supplied value that cannot be sent, e.g. an empty resource ID
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The client was closed; no further requests are sent
    #[error("client is closed")]
    Closed,
}

impl BlackRoadError {
    /// Create an API error from a status and raw response body
    pub fn api(status: StatusCode, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Api {
            status: status.as_u16(),
            message: parse_error_message(status, &body),
            body,
        }
    }

    /// Create a timeout error
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error is a 404
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the credential was rejected (401 or 403)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Check if this error is a 409, e.g. an already-claimed resource
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Check if this error is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if this error is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Whether repeating the same request could succeed.
    ///
    /// True for timeouts, transport failures, 429 and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_) | Self::Decode { .. } | Self::InvalidArgument { .. } | Self::Closed => {
                false
            }
        }
    }
}

impl From<serde_json::Error> for BlackRoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::decode(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    detail: Option<String>,
    error: Option<ErrorField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Object { message: Option<String> },
}

/// Extract a human-readable message from an error response body.
///
/// Looks for `message`, `error` (string or `{message}`) and `detail`; falls
/// back to the raw body, then to the status' canonical reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        let from_error = payload.error.and_then(|e| match e {
            ErrorField::Text(text) => Some(text),
            ErrorField::Object { message } => message,
        });
        let found = payload
            .message
            .into_iter()
            .chain(from_error)
            .chain(payload.detail)
            .find(|m| !m.trim().is_empty());
        if let Some(message) = found {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
