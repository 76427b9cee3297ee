//! Client for the Technitium DNS HTTP API
//!
//! Every call is a GET with its parameters in the query string. Technitium
//! wants a session token on each request, so [`ApiClient::call_api`] logs in
//! first, appends the fresh token as the `token` parameter and only then
//! performs the actual call. Tokens are never cached.
//!
//! All responses share one envelope:
//!
//! ```json
//! { "response": { ... }, "status": "ok", "errorMessage": null, "stackTrace": null }
//! ```
//!
//! A status other than `"ok"` becomes [`Error::Backend`] and the payload is
//! discarded, even when the server filled it in.

pub mod records;
pub mod users;
pub mod zones;

pub use records::{CreateRecordResponse, ListRecordsResponse, RData, Record, RecordRequest, ValueField};
pub use users::LoginResponse;
pub use zones::{ListZonesResponse, Zone};

use exdns_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Envelope status of a successful call
pub const STATUS_OK: &str = "ok";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters masked in diagnostic dumps
const SECRET_PARAMS: [&str; 2] = ["pass", "token"];

/// Connection settings for [`ApiClient`]
#[derive(Clone)]
pub struct Configuration {
    /// Base URL of the API, e.g. `http://dns.lan:5380`
    pub base_url: String,
    /// Login user
    pub user: String,
    /// Login password
    pub pass: String,
    /// Dump every request and response at debug level
    pub debug: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Configuration {
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        pass: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            user: user.into(),
            pass: pass.into(),
            debug: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("pass", &"<REDACTED>")
            .field("debug", &self.debug)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Response envelope shared by every endpoint
///
/// The payload is kept as raw JSON until the status has been checked, so a
/// failed call never has to decode a half-filled payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Operation-specific payload
    #[serde(default, alias = "data")]
    pub response: serde_json::Value,

    /// `"ok"` on success, anything else on failure
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error_message: Option<String>,
}

impl ApiResponse {
    /// Check the status and decode the payload
    pub fn into_payload<T: DeserializeOwned>(self, operation: &str) -> Result<T> {
        if self.status != STATUS_OK {
            return Err(Error::Backend {
                operation: operation.to_string(),
                status: self.status,
                message: self.error_message.unwrap_or_default(),
                stack_trace: self.stack_trace,
                inner_message: self.inner_error_message,
            });
        }

        serde_json::from_value(self.response)
            .map_err(|e| Error::decode(operation, format!("unexpected response payload: {}", e)))
    }
}

/// Technitium API client
#[derive(Clone)]
pub struct ApiClient {
    cfg: Configuration,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(cfg: Configuration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(cfg, http))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(mut cfg: Configuration, http: reqwest::Client) -> Self {
        cfg.base_url = cfg.base_url.trim_end_matches('/').to_string();
        Self { cfg, http }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.base_url, path)
    }

    /// Perform an authenticated call
    ///
    /// Logs in, appends the token to `query`, sends the request and decodes
    /// the envelope into `T`. Errors carry `operation` as their prefix.
    pub async fn call_api<Q, T>(&self, operation: &str, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.login_for(operation).await?;

        let request = self
            .http
            .get(self.url(path))
            .query(query)
            .query(&[("token", token.as_str())])
            .build()
            .map_err(|e| Error::transport(operation, format!("failed to build request: {}", e)))?;

        if self.cfg.debug {
            debug!("{}", dump_request(&request));
        }

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::transport(operation, e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(operation, format!("failed to read response: {}", e)))?;

        if self.cfg.debug {
            debug!("{}", dump_response(status, &headers, &body));
        }

        let envelope: ApiResponse = serde_json::from_slice(&body).map_err(|e| {
            Error::decode(operation, format!("HTTP {}: {}", status.as_u16(), e))
        })?;

        envelope.into_payload(operation)
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").field("cfg", &self.cfg).finish()
    }
}

/// Copy of `url` with secret query values masked
fn redacted_url(url: &reqwest::Url) -> reqwest::Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if SECRET_PARAMS.contains(&key.as_ref()) {
                "<REDACTED>".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted
}

fn dump_request(request: &reqwest::Request) -> String {
    let mut dump = format!("{} {} HTTP/1.1", request.method(), redacted_url(request.url()));
    for (name, value) in request.headers() {
        dump.push_str(&format!("\n{}: {}", name, value.to_str().unwrap_or("<binary>")));
    }
    dump
}

fn dump_response(
    status: reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &[u8],
) -> String {
    let mut dump = format!("HTTP/1.1 {}", status);
    for (name, value) in headers {
        dump.push_str(&format!("\n{}: {}", name, value.to_str().unwrap_or("<binary>")));
    }
    dump.push_str("\n\n");
    dump.push_str(&String::from_utf8_lossy(body));
    dump
}
