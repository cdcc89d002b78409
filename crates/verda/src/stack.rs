// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service stack construction shared by `verda serve` and `verda shell`.

use std::sync::Arc;

use tracing::{info, warn};

use verda_cloud::CloudClient;
use verda_config::VerdaConfig;
use verda_core::VerdaError;
use verda_gateway::HealthState;
use verda_impact::ImpactLedger;
use verda_local::LocalRuntime;
use verda_router::QueryRouter;
use verda_rules::RuleBasedHandler;

/// The wired-up request path: router, ledger, and health flags.
pub struct ServiceStack {
    pub router: Arc<QueryRouter>,
    pub ledger: Arc<ImpactLedger>,
    pub health: HealthState,
}

/// Construct all handlers, the ledger, and the router from configuration.
///
/// Probes the local runtime; a failed probe is not fatal -- the service
/// keeps serving the rule-based and cloud tiers and reports
/// `model_loaded: false` on `/health`.
pub async fn build_stack(config: &VerdaConfig) -> Result<ServiceStack, VerdaError> {
    let ledger = Arc::new(ImpactLedger::new(config.impact.clone()));

    let local = Arc::new(LocalRuntime::new(&config.local)?);
    let model_loaded = if config.routing.local_enabled {
        local.probe().await
    } else {
        info!("local tier disabled by configuration");
        false
    };
    if config.routing.local_enabled && !model_loaded {
        warn!("local runtime unavailable, local-tier queries will use the cloud");
    }

    let cloud = Arc::new(CloudClient::new(&config.cloud).inspect_err(|_| {
        eprintln!(
            "error: cloud API key required. Set via config or VERDA_CLOUD_API_KEY"
        );
    })?);

    let router = Arc::new(QueryRouter::new(
        &config.routing,
        Arc::new(RuleBasedHandler::new()),
        local,
        cloud,
        ledger.clone(),
    ));

    Ok(ServiceStack {
        router,
        ledger,
        health: HealthState::new(config.routing.local_enabled, model_loaded),
    })
}
