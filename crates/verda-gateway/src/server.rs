// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the service boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use verda_config::model::ServerConfig;
use verda_core::VerdaError;
use verda_impact::ImpactLedger;
use verda_router::QueryRouter;

use crate::handlers;

/// Health information for the `/health` endpoint.
///
/// `model_loaded` is shared with the local runtime probe so health always
/// reflects the latest known state, including a runtime that failed to load.
#[derive(Clone)]
pub struct HealthState {
    /// Service mode string: "local+cloud" or "cloud-only".
    pub mode: String,
    /// Whether the local tier is enabled by configuration.
    pub local_enabled: bool,
    /// Whether the local model runtime reported itself loaded.
    pub model_loaded: Arc<AtomicBool>,
}

impl HealthState {
    /// Build health state from the local tier configuration and probe outcome.
    pub fn new(local_enabled: bool, model_loaded: bool) -> Self {
        Self {
            mode: if local_enabled {
                "local+cloud".to_string()
            } else {
                "cloud-only".to_string()
            },
            local_enabled,
            model_loaded: Arc::new(AtomicBool::new(model_loaded)),
        }
    }

    /// Latest known local model state.
    pub fn is_model_loaded(&self) -> bool {
        self.model_loaded.load(Ordering::SeqCst)
    }
}

/// Shared state for axum request handlers, injected rather than global.
#[derive(Clone)]
pub struct GatewayState {
    /// The tier dispatch state machine.
    pub router: Arc<QueryRouter>,
    /// The impact ledger, read by `/stats`.
    pub ledger: Arc<ImpactLedger>,
    /// Health flags for `/health`.
    pub health: HealthState,
}

/// Build the gateway route table over the given state.
///
/// Exposed separately from [`start_server`] so tests can drive the router
/// without binding a socket.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/chat", post(handlers::post_chat))
        .route("/stats", get(handlers::get_stats))
        .route("/health", get(handlers::get_health))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP server and serve until the process stops.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), VerdaError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VerdaError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| VerdaError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
