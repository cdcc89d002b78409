// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `verda serve` command implementation.
//!
//! Starts the HTTP service: probes the local runtime, wires the tier
//! handlers and the impact ledger into the router, and serves `/chat`,
//! `/stats`, and `/health` until the process stops.

use tracing::info;

use verda_config::VerdaConfig;
use verda_core::VerdaError;
use verda_gateway::{start_server, GatewayState};

use crate::stack::build_stack;

/// Runs the `verda serve` command.
pub async fn run_serve(config: VerdaConfig) -> Result<(), VerdaError> {
    init_tracing(&config.agent.log_level);

    info!(name = config.agent.name.as_str(), "starting verda serve");

    let stack = build_stack(&config).await?;

    info!(
        mode = stack.health.mode.as_str(),
        model_loaded = stack.health.is_model_loaded(),
        "service stack ready"
    );
    info!("endpoints: POST /chat, GET /stats, GET /health");

    let state = GatewayState {
        router: stack.router,
        ledger: stack.ledger,
        health: stack.health,
    };

    start_server(&config.server, state).await?;

    info!("verda serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("verda={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
