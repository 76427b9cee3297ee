//! Login

use super::{ApiClient, STATUS_OK};
use exdns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const LOGIN_PATH: &str = "/api/user/login";

/// Body of `/api/user/login`
///
/// Unlike every other endpoint the login call answers without the
/// `response` wrapper.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_error_message: Option<String>,
}

// Custom Debug implementation that hides the session token
impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("display_name", &self.display_name)
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .field("status", &self.status)
            .field("error_message", &self.error_message)
            .finish()
    }
}

impl ApiClient {
    /// Obtain a fresh session token
    pub async fn login(&self) -> Result<String> {
        self.login_for("Login").await
    }

    /// Log in on behalf of `operation`; every failure is an
    /// [`Error::Authentication`] tagged with that operation.
    pub(crate) async fn login_for(&self, operation: &str) -> Result<String> {
        debug!("Logging in to {} as {}", self.cfg.base_url, self.cfg.user);

        let response = self
            .http
            .get(self.url(LOGIN_PATH))
            .query(&[
                ("user", self.cfg.user.as_str()),
                ("pass", self.cfg.pass.as_str()),
                ("includeInfo", "false"),
            ])
            .send()
            .await
            .map_err(|e| Error::auth(operation, format!("login request failed: {}", e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::auth(operation, format!("failed to read login response: {}", e)))?;

        let login: LoginResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::auth(operation, format!("failed to decode login response: {}", e)))?;

        if login.status != STATUS_OK {
            return Err(Error::auth(
                operation,
                format!(
                    "response status not 'ok': {}, {}",
                    login.status,
                    login.error_message.unwrap_or_default()
                ),
            ));
        }

        login
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::auth(operation, "login response carries no token"))
    }
}
