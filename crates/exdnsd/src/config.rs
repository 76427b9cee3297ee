//! Daemon configuration from environment variables

use anyhow::{Context, Result, anyhow, bail};
use exdns_core::{DomainFilterConfig, ProviderConfig, ServerConfig, WebhookConfig};
use std::env;
use std::str::FromStr;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => bail!("LOG_FORMAT '{}' is not valid. Valid formats: text, json", s),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook: WebhookConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| {
                anyhow!("{} is required. Set it via: export {}=...", key, key)
            })
        };

        let provider = ProviderConfig::Technitium {
            api_url: required("TECHNITIUM_API_URL")?,
            user: required("TECHNITIUM_USER")?,
            // Passwords may legitimately start or end with whitespace
            pass: lookup("TECHNITIUM_PASS")
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    anyhow!("TECHNITIUM_PASS is required. Set it via: export TECHNITIUM_PASS=...")
                })?,
            debug: var("TECHNITIUM_DEBUG")
                .map(|v| parse_bool("TECHNITIUM_DEBUG", &v))
                .transpose()?
                .unwrap_or(false),
            timeout_secs: parse_or("TECHNITIUM_TIMEOUT_SECS", var("TECHNITIUM_TIMEOUT_SECS"), 30)?,
        };

        let domain_filter = DomainFilterConfig {
            include: split_list(var("DOMAIN_FILTER")),
            exclude: split_list(var("EXCLUDE_DOMAIN_FILTER")),
            regex_include: var("REGEXP_DOMAIN_FILTER"),
            regex_exclude: var("REGEXP_DOMAIN_FILTER_EXCLUSION"),
        };

        let defaults = ServerConfig::default();
        let server = ServerConfig {
            webhook_host: var("SERVER_HOST").unwrap_or(defaults.webhook_host),
            webhook_port: parse_or("SERVER_PORT", var("SERVER_PORT"), defaults.webhook_port)?,
            health_host: var("HEALTH_HOST").unwrap_or(defaults.health_host),
            health_port: parse_or("HEALTH_PORT", var("HEALTH_PORT"), defaults.health_port)?,
        };

        Ok(Self {
            webhook: WebhookConfig {
                provider,
                domain_filter,
                server,
            },
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: var("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.webhook.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => bail!("{} must be true or false. Got: {}", key, value),
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .parse()
            .with_context(|| format!("{} must be a number. Got: {}", key, v)),
        None => Ok(default),
    }
}
