//! Configuration types for the webhook
//!
//! This module defines all configuration structures used throughout the
//! workspace. Loading them (from the environment) is the daemon's job.

use crate::domain_filter::DomainFilter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Main webhook configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Names the provider may manage
    #[serde(default)]
    pub domain_filter: DomainFilterConfig,

    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl WebhookConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.domain_filter.build()?;
        self.server.validate()?;
        Ok(())
    }
}

/// DNS provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Technitium DNS server
    Technitium {
        /// Base URL of the HTTP API (e.g. "http://dns.lan:5380")
        api_url: String,
        /// Login user
        user: String,
        /// Login password
        pass: String,
        /// Dump every request and response at debug level
        #[serde(default)]
        debug: bool,
        /// Per-request timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::Technitium {
                api_url,
                user,
                pass,
                timeout_secs,
                ..
            } => {
                if api_url.is_empty() {
                    return Err(crate::Error::config("Technitium API URL cannot be empty"));
                }
                if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                    return Err(crate::Error::config(format!(
                        "Technitium API URL must use HTTP or HTTPS scheme. Got: {}",
                        api_url
                    )));
                }
                if user.is_empty() {
                    return Err(crate::Error::config("Technitium user cannot be empty"));
                }
                if pass.is_empty() {
                    return Err(crate::Error::config("Technitium password cannot be empty"));
                }
                if !(1..=300).contains(timeout_secs) {
                    return Err(crate::Error::config(format!(
                        "Technitium timeout must be between 1 and 300 seconds. Got: {}",
                        timeout_secs
                    )));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Technitium { .. } => "technitium",
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Technitium {
            api_url: String::new(),
            user: String::new(),
            pass: String::new(),
            debug: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Technitium {
                api_url,
                user,
                debug,
                timeout_secs,
                ..
            } => f
                .debug_struct("Technitium")
                .field("api_url", api_url)
                .field("user", user)
                .field("pass", &"<REDACTED>")
                .field("debug", debug)
                .field("timeout_secs", timeout_secs)
                .finish(),
        }
    }
}

/// Domain filter configuration
///
/// When `regex_include` is set the suffix lists are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainFilterConfig {
    /// Domain suffixes to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Domain suffixes to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regular expression names must match
    #[serde(default)]
    pub regex_include: Option<String>,

    /// Regular expression names must not match
    #[serde(default)]
    pub regex_exclude: Option<String>,
}

impl DomainFilterConfig {
    /// Build the filter described by this configuration
    pub fn build(&self) -> Result<DomainFilter, crate::Error> {
        match self.regex_include.as_deref().filter(|re| !re.is_empty()) {
            Some(include) => DomainFilter::regex(include, self.regex_exclude.as_deref())
                .map_err(|e| crate::Error::config(format!("Invalid domain filter regex: {}", e))),
            None => Ok(DomainFilter::suffix(&self.include, &self.exclude)),
        }
    }
}

/// Listener configuration for the webhook and health endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Webhook listen host
    #[serde(default = "default_webhook_host")]
    pub webhook_host: String,

    /// Webhook listen port
    #[serde(default = "default_webhook_port")]
    pub webhook_port: u16,

    /// Health listen host
    #[serde(default = "default_health_host")]
    pub health_host: String,

    /// Health listen port
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

impl ServerConfig {
    /// Validate the listener configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.webhook_host.is_empty() || self.health_host.is_empty() {
            return Err(crate::Error::config("Listen host cannot be empty"));
        }
        if self.webhook_port == 0 || self.health_port == 0 {
            return Err(crate::Error::config("Listen port must be > 0"));
        }
        if self.webhook_host == self.health_host && self.webhook_port == self.health_port {
            return Err(crate::Error::config(format!(
                "Webhook and health listeners cannot share {}:{}",
                self.webhook_host, self.webhook_port
            )));
        }
        Ok(())
    }

    /// `host:port` of the webhook listener
    pub fn webhook_addr(&self) -> String {
        format!("{}:{}", self.webhook_host, self.webhook_port)
    }

    /// `host:port` of the health listener
    pub fn health_addr(&self) -> String {
        format!("{}:{}", self.health_host, self.health_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            webhook_host: default_webhook_host(),
            webhook_port: default_webhook_port(),
            health_host: default_health_host(),
            health_port: default_health_port(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_webhook_host() -> String {
    "127.0.0.1".to_string()
}

fn default_webhook_port() -> u16 {
    8888
}

fn default_health_host() -> String {
    "0.0.0.0".to_string()
}

fn default_health_port() -> u16 {
    8080
}
