// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tier dispatch state machine.
//!
//! Routing is a small forward-only state machine rather than a retry loop:
//! `Classifying -> Dispatching -> Succeeded | Escalating | Failed`.
//! Escalation moves exactly one tier up per failure and tiers only move
//! upward, so a request dispatches at most three times
//! (rule-based -> local -> cloud) and cycles are impossible.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use verda_config::model::RoutingConfig;
use verda_core::{AnswerResult, Tier, TierHandler, VerdaError};
use verda_impact::ImpactLedger;

use crate::classifier::Classifier;

/// States of one routed request.
enum RouteState {
    Classifying,
    Dispatching { tier: Tier },
    Escalating { from: Tier, to: Tier },
    Succeeded { result: AnswerResult },
    Failed { error: VerdaError },
}

/// Orchestrates classification, dispatch, escalation, and ledger updates.
///
/// Each call to [`QueryRouter::route`] is self-contained; the injected
/// ledger is the only shared state, and it is touched exactly once per
/// successful route, after the winning handler has returned.
pub struct QueryRouter {
    classifier: Classifier,
    rule_based: Arc<dyn TierHandler>,
    local: Arc<dyn TierHandler>,
    cloud: Arc<dyn TierHandler>,
    ledger: Arc<ImpactLedger>,
    local_enabled: bool,
}

impl QueryRouter {
    /// Create a router over the three tier handlers and the impact ledger.
    pub fn new(
        config: &RoutingConfig,
        rule_based: Arc<dyn TierHandler>,
        local: Arc<dyn TierHandler>,
        cloud: Arc<dyn TierHandler>,
        ledger: Arc<ImpactLedger>,
    ) -> Self {
        Self {
            classifier: Classifier::new(config),
            rule_based,
            local,
            cloud,
            ledger,
            local_enabled: config.local_enabled,
        }
    }

    /// Route one query to an answer.
    ///
    /// Failures at non-terminal tiers are recovered by escalating one tier
    /// up and never reach the caller; only a terminal-tier failure (or an
    /// empty prompt) surfaces as an error.
    pub async fn route(&self, query: &str) -> Result<AnswerResult, VerdaError> {
        let mut state = RouteState::Classifying;

        loop {
            state = match state {
                RouteState::Classifying => match self.classifier.classify(query) {
                    Ok(decision) => {
                        debug!(tier = %decision.tier, reason = decision.reason, "classified");
                        RouteState::Dispatching {
                            tier: decision.tier,
                        }
                    }
                    Err(VerdaError::EmptyPrompt) => RouteState::Failed {
                        error: VerdaError::EmptyPrompt,
                    },
                    Err(e) => {
                        // A total classifier cannot get here; default to the
                        // tier that can answer anything and log loudly.
                        error!(error = %e, "classifier fault, defaulting to cloud");
                        RouteState::Dispatching { tier: Tier::Cloud }
                    }
                },

                RouteState::Dispatching { tier } => {
                    match self.handler_for(tier).handle(query).await {
                        Ok(result) => RouteState::Succeeded { result },
                        Err(error) => match self.escalation_target(tier) {
                            Some(to) => {
                                warn!(from = %tier, to = %to, error = %error, "tier failed, escalating");
                                RouteState::Escalating { from: tier, to }
                            }
                            None => RouteState::Failed { error },
                        },
                    }
                }

                RouteState::Escalating { from, to } => {
                    debug!(from = %from, to = %to, "escalation step");
                    RouteState::Dispatching { tier: to }
                }

                RouteState::Succeeded { result } => {
                    self.ledger.record(&result);
                    info!(tier = %result.tier, tokens = result.tokens_used, "query routed");
                    return Ok(result);
                }

                RouteState::Failed { error } => {
                    error!(error = %error, category = error.category(), "routing failed");
                    return Err(error);
                }
            };
        }
    }

    fn handler_for(&self, tier: Tier) -> &Arc<dyn TierHandler> {
        match tier {
            Tier::RuleBased => &self.rule_based,
            Tier::Local => &self.local,
            Tier::Cloud => &self.cloud,
        }
    }

    /// One tier up, skipping a disabled local tier. `None` at the terminal.
    fn escalation_target(&self, from: Tier) -> Option<Tier> {
        match from.next() {
            Some(Tier::Local) if !self.local_enabled => Tier::Local.next(),
            next => next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use verda_config::model::ImpactConfig;

    /// What a mock handler does when dispatched to.
    enum MockOutcome {
        Answer(&'static str, u32),
        Unavailable,
        UpstreamError,
        RoutingFault,
    }

    /// Mock tier handler counting its invocations.
    struct MockHandler {
        tier: Tier,
        outcome: MockOutcome,
        calls: AtomicUsize,
    }

    impl MockHandler {
        fn new(tier: Tier, outcome: MockOutcome) -> Arc<Self> {
            Arc::new(Self {
                tier,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TierHandler for MockHandler {
        fn tier(&self) -> Tier {
            self.tier
        }

        async fn handle(&self, _query: &str) -> Result<AnswerResult, VerdaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                MockOutcome::Answer(text, tokens) => {
                    Ok(AnswerResult::with_tokens(*text, self.tier, *tokens))
                }
                MockOutcome::Unavailable => Err(VerdaError::HandlerUnavailable {
                    tier: self.tier,
                    message: "mock unavailable".into(),
                }),
                MockOutcome::UpstreamError => Err(VerdaError::UpstreamError {
                    status: 500,
                    message: "mock upstream error".into(),
                }),
                MockOutcome::RoutingFault => {
                    Err(VerdaError::RoutingFault("mock fault".into()))
                }
            }
        }
    }

    struct TestStack {
        router: QueryRouter,
        rule_based: Arc<MockHandler>,
        local: Arc<MockHandler>,
        cloud: Arc<MockHandler>,
        ledger: Arc<ImpactLedger>,
    }

    fn stack(
        config: RoutingConfig,
        rule_based: MockOutcome,
        local: MockOutcome,
        cloud: MockOutcome,
    ) -> TestStack {
        let rule_based = MockHandler::new(Tier::RuleBased, rule_based);
        let local = MockHandler::new(Tier::Local, local);
        let cloud = MockHandler::new(Tier::Cloud, cloud);
        let ledger = Arc::new(ImpactLedger::new(ImpactConfig::default()));
        let router = QueryRouter::new(
            &config,
            rule_based.clone(),
            local.clone(),
            cloud.clone(),
            ledger.clone(),
        );
        TestStack {
            router,
            rule_based,
            local,
            cloud,
            ledger,
        }
    }

    fn default_stack(rule_based: MockOutcome, local: MockOutcome, cloud: MockOutcome) -> TestStack {
        stack(RoutingConfig::default(), rule_based, local, cloud)
    }

    #[tokio::test]
    async fn rule_query_never_touches_model_tiers() {
        let s = default_stack(
            MockOutcome::Answer("Hello!", 0),
            MockOutcome::Answer("unused", 0),
            MockOutcome::Answer("unused", 0),
        );

        let result = s.router.route("hi").await.unwrap();
        assert_eq!(result.tier, Tier::RuleBased);
        assert_eq!(s.rule_based.calls(), 1);
        assert_eq!(s.local.calls(), 0);
        assert_eq!(s.cloud.calls(), 0);
        assert_eq!(s.ledger.snapshot().rule_based_responses, 1);
    }

    #[tokio::test]
    async fn factual_query_dispatches_local() {
        let s = default_stack(
            MockOutcome::Answer("unused", 0),
            MockOutcome::Answer("ML is pattern learning.", 0),
            MockOutcome::Answer("unused", 0),
        );

        let result = s.router.route("explain machine learning").await.unwrap();
        assert_eq!(result.tier, Tier::Local);
        assert_eq!(s.local.calls(), 1);
        assert_eq!(s.cloud.calls(), 0);
        assert_eq!(s.ledger.snapshot().local_responses, 1);
    }

    #[tokio::test]
    async fn local_failure_escalates_once_to_cloud() {
        let s = default_stack(
            MockOutcome::Answer("unused", 0),
            MockOutcome::Unavailable,
            MockOutcome::Answer("cloud answer", 42),
        );

        let result = s.router.route("explain machine learning").await.unwrap();
        assert_eq!(result.tier, Tier::Cloud);
        assert_eq!(result.tokens_used, 42);
        assert_eq!(s.local.calls(), 1, "local must be tried exactly once");
        assert_eq!(s.cloud.calls(), 1, "cloud must be tried exactly once");

        // Only the winning tier is counted.
        let stats = s.ledger.snapshot();
        assert_eq!(stats.local_responses, 0);
        assert_eq!(stats.cloud_responses, 1);
    }

    #[tokio::test]
    async fn rule_fault_escalates_to_local() {
        let s = default_stack(
            MockOutcome::RoutingFault,
            MockOutcome::Answer("local covers it", 0),
            MockOutcome::Answer("unused", 0),
        );

        let result = s.router.route("hi").await.unwrap();
        assert_eq!(result.tier, Tier::Local);
        assert_eq!(s.rule_based.calls(), 1);
        assert_eq!(s.local.calls(), 1);
        assert_eq!(s.cloud.calls(), 0);
    }

    #[tokio::test]
    async fn full_escalation_chain_ends_at_cloud() {
        let s = default_stack(
            MockOutcome::RoutingFault,
            MockOutcome::Unavailable,
            MockOutcome::Answer("cloud answer", 10),
        );

        let result = s.router.route("hi").await.unwrap();
        assert_eq!(result.tier, Tier::Cloud);
        assert_eq!(s.rule_based.calls(), 1);
        assert_eq!(s.local.calls(), 1);
        assert_eq!(s.cloud.calls(), 1);
    }

    #[tokio::test]
    async fn terminal_failure_surfaces_and_counts_nothing() {
        let s = default_stack(
            MockOutcome::Answer("unused", 0),
            MockOutcome::Unavailable,
            MockOutcome::UpstreamError,
        );

        let err = s.router.route("explain machine learning").await.unwrap_err();
        assert!(matches!(err, VerdaError::UpstreamError { .. }));
        assert_eq!(s.cloud.calls(), 1, "cloud is terminal, no retry");
        assert_eq!(s.ledger.snapshot().total_queries(), 0);
    }

    #[tokio::test]
    async fn empty_prompt_fails_before_any_dispatch() {
        let s = default_stack(
            MockOutcome::Answer("unused", 0),
            MockOutcome::Answer("unused", 0),
            MockOutcome::Answer("unused", 0),
        );

        let err = s.router.route("   ").await.unwrap_err();
        assert!(matches!(err, VerdaError::EmptyPrompt));
        assert_eq!(s.rule_based.calls(), 0);
        assert_eq!(s.local.calls(), 0);
        assert_eq!(s.cloud.calls(), 0);
        assert_eq!(s.ledger.snapshot().total_queries(), 0);
    }

    #[tokio::test]
    async fn disabled_local_tier_is_skipped_entirely() {
        let config = RoutingConfig {
            local_enabled: false,
            ..RoutingConfig::default()
        };
        let s = stack(
            config,
            MockOutcome::RoutingFault,
            MockOutcome::Answer("must not run", 0),
            MockOutcome::Answer("cloud answer", 7),
        );

        // Classifier sends would-be-local queries straight to cloud.
        let result = s.router.route("explain machine learning").await.unwrap();
        assert_eq!(result.tier, Tier::Cloud);
        assert_eq!(s.local.calls(), 0);

        // And a rule fault escalates past the disabled local tier.
        let result = s.router.route("hi").await.unwrap();
        assert_eq!(result.tier, Tier::Cloud);
        assert_eq!(s.local.calls(), 0);
        assert_eq!(s.cloud.calls(), 2);
    }

    #[tokio::test]
    async fn ledger_counts_match_routed_queries() {
        let s = default_stack(
            MockOutcome::Answer("Hello!", 0),
            MockOutcome::Answer("local answer", 0),
            MockOutcome::Answer("cloud answer", 20),
        );

        s.router.route("hi").await.unwrap();
        s.router.route("hello").await.unwrap();
        s.router.route("explain machine learning").await.unwrap();
        s.router
            .route("write a detailed analysis of quantum computing")
            .await
            .unwrap();

        let stats = s.ledger.snapshot();
        assert_eq!(stats.rule_based_responses, 2);
        assert_eq!(stats.local_responses, 1);
        assert_eq!(stats.cloud_responses, 1);
        assert_eq!(stats.total_queries(), 4);
        assert_eq!(stats.total_tokens_used, 20);
    }
}
