//! Request executor for the BlackRoad OS API.
//!
//! One executor owns the HTTP connection pool for a client. It attaches the
//! standard headers, serializes bodies, enforces the timeout, and maps every
//! outcome onto [`BlackRoadError`]. It never retries. Once
//! [`close`](RequestExecutor::close)d it drops the pool and refuses further
//! requests.
//!
//! # Usage
//!
//! ```rust,no_run
//! use blackroad_sdk::{ClientConfig, ClientOptions, Method, QueryParams, RequestExecutor};
//!
//! async fn example() -> blackroad_sdk::BlackRoadResult<()> {
//!     let config = ClientConfig::resolve(ClientOptions::default())?;
//!     let executor = RequestExecutor::new(config)?;
//!     let stats = executor
//!         .execute(Method::GET, "/v1/codex/stats", None::<&()>, &QueryParams::new())
//!         .await?;
//!     println!("{stats}");
//!     Ok(())
//! }
//! ```

mod query;

pub use query::QueryParams;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{BlackRoadError, BlackRoadResult};

/// Client identifier sent as `User-Agent`
pub const USER_AGENT: &str = concat!("blackroad-rust/", env!("CARGO_PKG_VERSION"));

/// Executes HTTP requests against the API
#[derive(Debug)]
pub struct RequestExecutor {
    config: ClientConfig,
    /// `None` once closed
    client: RwLock<Option<reqwest::Client>>,
}

impl RequestExecutor {
    /// Build an executor. No connection is opened until the first request.
    pub fn new(config: ClientConfig) -> BlackRoadResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key())).map_err(
            |_| ConfigError::InvalidValue {
                field: "api_key".into(),
                message: "contains characters not allowed in an HTTP header".into(),
            },
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(BlackRoadError::Transport)?;

        Ok(Self {
            config,
            client: RwLock::new(Some(client)),
        })
    }

    /// Resolved configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Drop the connection pool. Every later request, from any holder of
    /// this executor, fails with [`BlackRoadError::Closed`]. Requests already
    /// in flight run to completion.
    pub fn close(&self) {
        let released = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if released {
            debug!(base_url = self.config.base_url(), "Closed request executor");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Send one request and return the response body as generic JSON.
    ///
    /// `body` is serialized only when supplied. A 2xx response with an empty
    /// body yields `Value::Null`.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &QueryParams,
    ) -> BlackRoadResult<Value>
    where
        B: Serialize + ?Sized,
    {
        let client = self
            .client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(BlackRoadError::Closed)?;

        let url = format!("{}{}", self.config.base_url(), path);
        debug!(%method, %url, params = query.len(), "API request");

        let mut req = client.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let err = BlackRoadError::api(status, String::from_utf8_lossy(&bytes));
            warn!(%method, path, status = status.as_u16(), "{}", err);
            return Err(err);
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| BlackRoadError::decode(format!("invalid JSON from {path}: {e}")))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &QueryParams) -> BlackRoadResult<T> {
        let value = self.execute(Method::GET, path, None::<&()>, query).await?;
        decode(value)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BlackRoadResult<T> {
        let value = self.execute(Method::POST, path, Some(body), &QueryParams::new()).await?;
        decode(value)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> BlackRoadResult<T> {
        let value = self.execute(Method::PUT, path, Some(body), &QueryParams::new()).await?;
        decode(value)
    }

    pub async fn delete(&self, path: &str) -> BlackRoadResult<Value> {
        self.execute(Method::DELETE, path, None::<&()>, &QueryParams::new())
            .await
    }

    fn transport_error(&self, err: reqwest::Error) -> BlackRoadError {
        if err.is_timeout() {
            BlackRoadError::timeout(self.config.timeout().as_millis() as u64)
        } else {
            BlackRoadError::Transport(err)
        }
    }
}

/// Percent-encode one caller-supplied path segment, such as a resource ID.
///
/// `/`, `?`, `#` and `%` are escaped so the ID stays a single segment.
/// Empty, `.` and `..` are rejected: URL normalization would resolve them to
/// a different path however they are encoded.
pub fn path_segment(segment: &str) -> BlackRoadResult<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(BlackRoadError::invalid_argument(format!(
            "{segment:?} is not a usable resource id"
        )));
    }

    let mut url = Url::parse("http://localhost/")
        .map_err(|e| BlackRoadError::invalid_argument(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| BlackRoadError::invalid_argument("cannot encode path segment"))?
        .pop_if_empty()
        .push(segment);

    Ok(url.path().trim_start_matches('/').to_string())
}

/// Decode a JSON value into a typed record
pub fn decode<T: DeserializeOwned>(value: Value) -> BlackRoadResult<T> {
    serde_json::from_value(value).map_err(|e| BlackRoadError::decode(e.to_string()))
}
