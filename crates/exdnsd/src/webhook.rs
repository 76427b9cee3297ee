//! external-dns webhook HTTP surface
//!
//! ```text
//! webhook listener                      health listener
//! ├── GET  /                 negotiate  ├── GET /healthz
//! ├── GET  /records          list       └── GET /readyz
//! ├── POST /records          apply
//! └── POST /adjustendpoints  adjust
//! ```
//!
//! Webhook responses carry the versioned external-dns media type. Request
//! bodies are read as raw bytes because external-dns sends that media type
//! rather than `application/json`.

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use exdns_core::{Changes, DnsProvider, DomainFilter, Endpoint, ServerConfig};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Media type of every webhook response
pub const MEDIA_TYPE: &str = "application/external.dns.webhook+json;version=1";

/// Provider shared by all handlers
pub type SharedProvider = Arc<dyn DnsProvider>;

/// Build the webhook router
pub fn webhook_router(provider: SharedProvider) -> Router {
    Router::new()
        .route("/", get(negotiate))
        .route("/records", get(records).post(apply_changes))
        .route("/adjustendpoints", post(adjust_endpoints))
        .with_state(provider)
}

/// Build the health router
pub fn health_router() -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/readyz", get(|| async { "ok" }))
}

/// Serve both listeners until `shutdown` fires
pub async fn serve(
    server: &ServerConfig,
    provider: SharedProvider,
    shutdown: watch::Receiver<()>,
) -> Result<()> {
    let webhook_listener = TcpListener::bind(server.webhook_addr())
        .await
        .with_context(|| format!("failed to bind webhook listener to {}", server.webhook_addr()))?;
    let health_listener = TcpListener::bind(server.health_addr())
        .await
        .with_context(|| format!("failed to bind health listener to {}", server.health_addr()))?;

    info!("Webhook listening on http://{}", webhook_listener.local_addr()?);
    info!("Health checks listening on http://{}", health_listener.local_addr()?);

    let webhook = axum::serve(webhook_listener, webhook_router(provider))
        .with_graceful_shutdown(shutdown_requested(shutdown.clone()));
    let health = axum::serve(health_listener, health_router())
        .with_graceful_shutdown(shutdown_requested(shutdown));

    tokio::try_join!(
        async { webhook.await.context("webhook server exited with error") },
        async { health.await.context("health server exited with error") },
    )?;

    Ok(())
}

/// Resolves once a shutdown is signalled or the sender is gone
async fn shutdown_requested(mut shutdown: watch::Receiver<()>) {
    let _ = shutdown.changed().await;
}

/// JSON body with the webhook media type
struct WebhookJson<T>(T);

impl<T: Serialize> IntoResponse for WebhookJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE))],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode response: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Handler failure: status plus plain-text message
struct WebhookError(StatusCode, String);

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

impl From<exdns_core::Error> for WebhookError {
    fn from(err: exdns_core::Error) -> Self {
        error!("{}", err);
        WebhookError(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

fn bad_request(what: &str, err: serde_json::Error) -> WebhookError {
    error!("Failed to decode {}: {}", what, err);
    WebhookError(StatusCode::BAD_REQUEST, format!("invalid {}: {}", what, err))
}

async fn negotiate(State(provider): State<SharedProvider>) -> WebhookJson<DomainFilter> {
    WebhookJson(provider.domain_filter().clone())
}

async fn records(
    State(provider): State<SharedProvider>,
) -> Result<WebhookJson<Vec<Endpoint>>, WebhookError> {
    let endpoints = provider.records().await?;
    debug!("Returning {} endpoints", endpoints.len());
    Ok(WebhookJson(endpoints))
}

async fn apply_changes(
    State(provider): State<SharedProvider>,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let changes: Option<Changes> =
        serde_json::from_slice(&body).map_err(|e| bad_request("changes", e))?;

    provider.apply_changes(changes).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_endpoints(
    State(provider): State<SharedProvider>,
    body: Bytes,
) -> Result<WebhookJson<Vec<Endpoint>>, WebhookError> {
    let endpoints: Vec<Endpoint> =
        serde_json::from_slice(&body).map_err(|e| bad_request("endpoints", e))?;

    Ok(WebhookJson(provider.adjust_endpoints(endpoints).await?))
}
