// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide impact ledger.
//!
//! All totals start at zero when the service starts and are only reset by a
//! process restart. Each successfully routed query applies exactly one
//! atomic bookkeeping unit under the ledger mutex; the mutex is never held
//! across an await point, and handlers never run while it is held.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use verda_config::model::ImpactConfig;
use verda_core::{AnswerResult, Tier};

/// A consistent snapshot of the ledger totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactStats {
    /// Queries answered by the rule table.
    pub rule_based_responses: u64,
    /// Queries answered by the local model.
    pub local_responses: u64,
    /// Queries answered by the cloud model.
    pub cloud_responses: u64,
    /// Tokens saved versus sending everything to the cloud.
    pub tokens_saved: u64,
    /// Estimated grams of CO2 saved.
    pub co2_saved_grams: f64,
    /// Estimated millilitres of cooling water saved.
    pub water_saved_ml: f64,
    /// Tokens actually consumed by cloud calls.
    pub total_tokens_used: u64,
}

impl ImpactStats {
    /// Total successfully routed queries since start.
    pub fn total_queries(&self) -> u64 {
        self.rule_based_responses + self.local_responses + self.cloud_responses
    }
}

/// Lock-guarded accumulator of per-tier counts and saved resources.
///
/// Shared across all requests for the lifetime of the service and passed to
/// request handlers via dependency injection.
pub struct ImpactLedger {
    estimates: ImpactConfig,
    totals: Mutex<ImpactStats>,
}

impl ImpactLedger {
    /// Create a ledger with all totals at zero.
    pub fn new(estimates: ImpactConfig) -> Self {
        Self {
            estimates,
            totals: Mutex::new(ImpactStats::default()),
        }
    }

    /// Fold a completed answer into the totals.
    ///
    /// Rule-based and local successes credit savings; cloud successes only
    /// count and meter token consumption. Failed results are ignored: the
    /// router never records a failed route as a success.
    pub fn record(&self, result: &AnswerResult) {
        if !result.succeeded {
            debug!(tier = %result.tier, "ignoring failed result");
            return;
        }

        // Derive the credit before taking the lock.
        let (saved_tokens, co2, water) = match result.tier {
            Tier::RuleBased => self.credit(self.estimates.rule_based_saved_tokens),
            Tier::Local => self.credit(self.estimates.local_saved_tokens),
            Tier::Cloud => (0, 0.0, 0.0),
        };

        {
            // The guarded section is pure arithmetic; recover the totals
            // rather than propagating a poison from an unrelated panic.
            let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
            match result.tier {
                Tier::RuleBased => totals.rule_based_responses += 1,
                Tier::Local => totals.local_responses += 1,
                Tier::Cloud => {
                    totals.cloud_responses += 1;
                    totals.total_tokens_used += u64::from(result.tokens_used);
                }
            }
            totals.tokens_saved += saved_tokens;
            totals.co2_saved_grams += co2;
            totals.water_saved_ml += water;
        }

        info!(
            tier = %result.tier,
            tokens = result.tokens_used,
            saved_tokens,
            "impact recorded"
        );
    }

    /// A consistent copy of the current totals.
    pub fn snapshot(&self) -> ImpactStats {
        self.totals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Estimated CO2 for a metered cloud call, for response reporting.
    pub fn co2_grams_for(&self, tokens: u32) -> f64 {
        f64::from(tokens) * self.estimates.co2_grams_per_token
    }

    fn credit(&self, saved_tokens: u32) -> (u64, f64, f64) {
        (
            u64::from(saved_tokens),
            f64::from(saved_tokens) * self.estimates.co2_grams_per_token,
            self.estimates.water_ml_per_query,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_ledger() -> ImpactLedger {
        ImpactLedger::new(ImpactConfig {
            rule_based_saved_tokens: 150,
            local_saved_tokens: 100,
            co2_grams_per_token: 0.002,
            water_ml_per_query: 25.0,
        })
    }

    #[test]
    fn starts_at_zero() {
        let stats = test_ledger().snapshot();
        assert_eq!(stats, ImpactStats::default());
        assert_eq!(stats.total_queries(), 0);
    }

    #[test]
    fn rule_based_success_credits_full_avoided_call() {
        let ledger = test_ledger();
        ledger.record(&AnswerResult::ok("hello", Tier::RuleBased));

        let stats = ledger.snapshot();
        assert_eq!(stats.rule_based_responses, 1);
        assert_eq!(stats.tokens_saved, 150);
        assert!((stats.co2_saved_grams - 0.3).abs() < 1e-10);
        assert!((stats.water_saved_ml - 25.0).abs() < 1e-10);
        assert_eq!(stats.total_tokens_used, 0);
    }

    #[test]
    fn local_success_credits_the_delta() {
        let ledger = test_ledger();
        ledger.record(&AnswerResult::ok("answer", Tier::Local));

        let stats = ledger.snapshot();
        assert_eq!(stats.local_responses, 1);
        assert_eq!(stats.tokens_saved, 100);
        assert!((stats.co2_saved_grams - 0.2).abs() < 1e-10);
    }

    #[test]
    fn cloud_success_credits_nothing_but_meters_tokens() {
        let ledger = test_ledger();
        ledger.record(&AnswerResult::with_tokens("answer", Tier::Cloud, 42));

        let stats = ledger.snapshot();
        assert_eq!(stats.cloud_responses, 1);
        assert_eq!(stats.tokens_saved, 0);
        assert!(stats.co2_saved_grams.abs() < f64::EPSILON);
        assert!(stats.water_saved_ml.abs() < f64::EPSILON);
        assert_eq!(stats.total_tokens_used, 42);
    }

    #[test]
    fn failed_results_are_ignored() {
        let ledger = test_ledger();
        ledger.record(&AnswerResult::failed(Tier::Cloud));
        assert_eq!(ledger.snapshot().total_queries(), 0);
    }

    #[test]
    fn savings_are_monotonically_non_decreasing() {
        let ledger = test_ledger();
        let mut last = ledger.snapshot();
        let results = [
            AnswerResult::ok("a", Tier::RuleBased),
            AnswerResult::with_tokens("b", Tier::Cloud, 10),
            AnswerResult::ok("c", Tier::Local),
            AnswerResult::with_tokens("d", Tier::Cloud, 5),
            AnswerResult::ok("e", Tier::RuleBased),
        ];
        for result in &results {
            ledger.record(result);
            let now = ledger.snapshot();
            assert!(now.tokens_saved >= last.tokens_saved);
            assert!(now.co2_saved_grams >= last.co2_saved_grams);
            assert!(now.water_saved_ml >= last.water_saved_ml);
            last = now;
        }
    }

    #[test]
    fn counts_satisfy_the_total_invariant() {
        let ledger = test_ledger();
        ledger.record(&AnswerResult::ok("a", Tier::RuleBased));
        ledger.record(&AnswerResult::ok("b", Tier::Local));
        ledger.record(&AnswerResult::with_tokens("c", Tier::Cloud, 7));

        let stats = ledger.snapshot();
        assert_eq!(
            stats.total_queries(),
            stats.rule_based_responses + stats.local_responses + stats.cloud_responses
        );
        assert_eq!(stats.total_queries(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_records_lose_no_updates() {
        const PER_TIER: u64 = 50;

        let ledger = Arc::new(test_ledger());
        let mut tasks = Vec::new();

        for i in 0..(PER_TIER * 3) {
            let ledger = Arc::clone(&ledger);
            tasks.push(tokio::spawn(async move {
                let result = match i % 3 {
                    0 => AnswerResult::ok("a", Tier::RuleBased),
                    1 => AnswerResult::ok("b", Tier::Local),
                    _ => AnswerResult::with_tokens("c", Tier::Cloud, 10),
                };
                ledger.record(&result);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let stats = ledger.snapshot();
        assert_eq!(stats.rule_based_responses, PER_TIER);
        assert_eq!(stats.local_responses, PER_TIER);
        assert_eq!(stats.cloud_responses, PER_TIER);
        assert_eq!(stats.total_queries(), PER_TIER * 3);
        assert_eq!(stats.tokens_saved, PER_TIER * 150 + PER_TIER * 100);
        assert_eq!(stats.total_tokens_used, PER_TIER * 10);
    }

    #[test]
    fn co2_for_metered_cloud_call() {
        let ledger = test_ledger();
        assert!((ledger.co2_grams_for(100) - 0.2).abs() < 1e-10);
        assert!(ledger.co2_grams_for(0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_serialize_with_field_names() {
        let stats = ImpactStats {
            rule_based_responses: 1,
            ..ImpactStats::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"rule_based_responses\":1"));
        assert!(json.contains("\"tokens_saved\""));
        assert!(json.contains("\"water_saved_ml\""));
    }
}
