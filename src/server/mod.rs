//! Web server — serves the annotation UI at `/` and the JSON API under
//! `/api/`. One outbound inference call per annotate request; provider
//! failures become error responses, never a dead session.

mod api;
mod ui;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::{get, post}};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::radgraph::AnnotatorProvider;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — all fields are reference-counted.
#[derive(Clone)]
pub(crate) struct AppState {
    pub provider: AnnotatorProvider,
    /// Default model id; requests may override it per call.
    pub model_id: Arc<str>,
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Serve until ctrl-c.
pub async fn run(config: &Config, provider: AnnotatorProvider) -> Result<(), AppError> {
    let state = AppState {
        provider,
        model_id: Arc::from(config.model_id.as_str()),
    };
    let router = build_router(state);

    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {}: {e}", config.bind)))?;

    info!(bind = %config.bind, "listening — open http://{} in a browser", config.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("server shut down");
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/api/annotate", post(api::annotate))
        .route("/api/health", get(api::health))
        .route("/favicon.ico", get(|| async { StatusCode::NO_CONTENT }))
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!("ctrl-c handler failed: {e}"),
    }
}
