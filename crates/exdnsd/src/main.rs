// # exdnsd - external-dns webhook daemon
//
// Serves the external-dns webhook protocol on top of a Technitium DNS server.
//
// The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering providers and creating the configured one
// 4. Serving the webhook and health listeners until SIGTERM/SIGINT
//
// Record logic lives in the provider crates; this binary only wires it up.
//
// ## Configuration
//
// ### Technitium
// - `TECHNITIUM_API_URL`: Base URL of the HTTP API (required)
// - `TECHNITIUM_USER`: Login user (required)
// - `TECHNITIUM_PASS`: Login password (required)
// - `TECHNITIUM_DEBUG`: Dump requests and responses at debug level (default: false)
// - `TECHNITIUM_TIMEOUT_SECS`: Per-request timeout (default: 30)
//
// ### Domain Filter
// - `DOMAIN_FILTER`: Comma-separated suffixes to include
// - `EXCLUDE_DOMAIN_FILTER`: Comma-separated suffixes to exclude
// - `REGEXP_DOMAIN_FILTER`: Regex names must match (overrides the suffix lists)
// - `REGEXP_DOMAIN_FILTER_EXCLUSION`: Regex names must not match
//
// ### Listeners
// - `SERVER_HOST` / `SERVER_PORT`: Webhook listener (default: 127.0.0.1:8888)
// - `HEALTH_HOST` / `HEALTH_PORT`: Health listener (default: 0.0.0.0:8080)
//
// ### Logging
// - `LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `LOG_FORMAT`: text or json (default: text)
// - `RUST_LOG`: Overrides `LOG_LEVEL` with a full filter directive
//
// ## Example
//
// ```bash
// export TECHNITIUM_API_URL=http://dns.lan:5380
// export TECHNITIUM_USER=admin
// export TECHNITIUM_PASS=secret
// export DOMAIN_FILTER=example.com
//
// exdnsd
// ```

mod config;
mod webhook;

use anyhow::{Context, Result};
use config::{Config, LogFormat};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ExdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ExdnsExitCode> for ExitCode {
    fn from(code: ExdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ExdnsExitCode::ConfigError.into();
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("{:#}", e);
        return ExdnsExitCode::ConfigError.into();
    }

    info!("Starting exdnsd {}", env!("CARGO_PKG_VERSION"));
    debug!("Provider configuration: {:?}", config.webhook.provider);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ExdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            ExdnsExitCode::RuntimeError
        } else {
            ExdnsExitCode::CleanShutdown
        }
    })
    .into()
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `LOG_LEVEL` when set.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_lowercase()));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    match config.log_format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
    .context("Failed to set tracing subscriber")
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let registry = exdns_core::ProviderRegistry::new();

    #[cfg(feature = "technitium")]
    {
        info!("Registering Technitium provider");
        exdns_provider_technitium::register(&registry);
    }

    let domain_filter = config.webhook.domain_filter.build()?;
    let provider: webhook::SharedProvider = Arc::from(
        registry
            .create_provider(&config.webhook.provider, domain_filter)
            .context("Failed to create DNS provider")?,
    );
    info!("Using {} provider", provider.provider_name());

    let (shutdown_tx, shutdown_rx) = watch::channel(());

    let signals = async move {
        let signal = wait_for_shutdown().await?;
        info!("Received shutdown signal: {}", signal);
        info!("Shutting down daemon");
        let _ = shutdown_tx.send(());
        Ok::<(), anyhow::Error>(())
    };

    tokio::try_join!(
        webhook::serve(&config.webhook.server, provider, shutdown_rx),
        signals,
    )?;

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
