// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /chat, GET /stats, GET /health.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};

use verda_core::VerdaError;
use verda_impact::{report, ImpactStats};

use crate::server::GatewayState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's prompt text.
    pub prompt: String,
}

/// Response body for POST /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The answer text.
    pub answer: String,
    /// Which tier produced the answer: "rule-based", "local", or "cloud".
    pub source: String,
    /// Tokens consumed by the answer (zero below the cloud tier).
    pub tokens: u32,
    /// Estimated grams of CO2 for the answer (zero below the cloud tier).
    pub co2: f64,
}

/// Response body for GET /stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Human-readable impact summary.
    pub report: String,
    /// Raw ledger totals.
    pub stats: ImpactStats,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the service can answer at all.
    pub status: String,
    /// Service mode: "local+cloud" or "cloud-only".
    pub mode: String,
    /// Whether the local model runtime is loaded.
    pub model_loaded: bool,
    /// Whether the local tier is enabled by configuration.
    pub local_enabled: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable error category (see `VerdaError::category`).
    pub error: String,
}

/// POST /chat
///
/// Validates the prompt, routes it through the tier state machine, and
/// returns the answer with its source tier and metered cost. Terminal
/// failures map to a stable category and an appropriate status code.
pub async fn post_chat(
    State(state): State<GatewayState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    // Reject before classification so invalid prompts never reach the
    // router or the ledger.
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return error_response(&VerdaError::EmptyPrompt);
    }

    let request_id = uuid::Uuid::new_v4();
    let routed = state
        .router
        .route(prompt)
        .instrument(info_span!("chat", request_id = %request_id))
        .await;

    match routed {
        Ok(result) => {
            let response = ChatResponse {
                source: result.tier.to_string(),
                co2: state.ledger.co2_grams_for(result.tokens_used),
                tokens: result.tokens_used,
                answer: result.text,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET /stats
///
/// Returns the impact report and raw totals. Read-only: a consistent
/// snapshot of the ledger, never a mutation.
pub async fn get_stats(State(state): State<GatewayState>) -> Json<StatsResponse> {
    let stats = state.ledger.snapshot();
    debug!(total = stats.total_queries(), "stats requested");
    Json(StatsResponse {
        report: report::render(&stats),
        stats,
    })
}

/// GET /health
///
/// Responds even when the local runtime failed to load; the service keeps
/// serving the rule-based and cloud tiers in that case.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        mode: state.health.mode.clone(),
        model_loaded: state.health.is_model_loaded(),
        local_enabled: state.health.local_enabled,
    })
}

/// Map an error to its response: status code plus stable category.
fn error_response(error: &VerdaError) -> Response {
    let status = match error {
        VerdaError::EmptyPrompt => StatusCode::BAD_REQUEST,
        VerdaError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        VerdaError::UpstreamError { .. } | VerdaError::Unreachable { .. } => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.category().to_string(),
        }),
    )
        .into_response()
}
