// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic tier classification.
//!
//! Maps a query to the cheapest tier that can safely answer it using pure
//! string heuristics. No model pre-call, no network, no latency: the rule
//! table is checked first, then the cloud escalation triggers, then the
//! local tier takes whatever remains.

use verda_config::model::RoutingConfig;
use verda_core::{Tier, TierDecision, VerdaError};
use verda_rules::RuleTable;

/// Depth/detail request indicators (contains, case-insensitive).
/// Any of these sends the query to the cloud tier regardless of length.
const DEPTH_INDICATORS: &[&str] = &[
    "write code",
    "create a program",
    "explain in detail",
    "comprehensive analysis",
    "detailed analysis",
    "step by step guide",
    "detailed explanation",
    "compare and contrast",
    "prove mathematically",
    "write an essay",
    "design a system",
    "in depth",
];

/// Heuristic tier classifier.
///
/// Deterministic and total: every non-empty query maps to exactly one tier;
/// empty input is an error, not a tier. Configuration is bound at
/// construction so classification itself performs no I/O and mutates no
/// shared state.
pub struct Classifier {
    rules: RuleTable,
    cloud_word_threshold: usize,
    local_enabled: bool,
}

impl Classifier {
    /// Create a classifier from routing configuration.
    pub fn new(config: &RoutingConfig) -> Self {
        Self {
            rules: RuleTable::new(),
            cloud_word_threshold: config.cloud_word_threshold,
            local_enabled: config.local_enabled,
        }
    }

    /// Classify a query into a tier decision.
    ///
    /// Tie-break order: the rule table is most specific and wins outright;
    /// then the cloud escalation triggers (length, depth keywords, disabled
    /// local tier); everything else is a bounded factual query for the
    /// local model. The cheapest matching tier wins.
    pub fn classify(&self, query: &str) -> Result<TierDecision, VerdaError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(VerdaError::EmptyPrompt);
        }

        if self.rules.matches(trimmed) {
            return Ok(TierDecision {
                tier: Tier::RuleBased,
                reason: "rule table match",
            });
        }

        // Lowercase for matching only; handlers receive the original casing.
        let lower = trimmed.to_lowercase();

        let word_count = trimmed.split_whitespace().count();
        if word_count > self.cloud_word_threshold {
            return Ok(TierDecision {
                tier: Tier::Cloud,
                reason: "word count above cloud threshold",
            });
        }

        if DEPTH_INDICATORS.iter().any(|k| lower.contains(k)) {
            return Ok(TierDecision {
                tier: Tier::Cloud,
                reason: "depth indicator",
            });
        }

        if !self.local_enabled {
            return Ok(TierDecision {
                tier: Tier::Cloud,
                reason: "local tier disabled",
            });
        }

        Ok(TierDecision {
            tier: Tier::Local,
            reason: "bounded factual query",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&RoutingConfig::default())
    }

    #[test]
    fn greetings_classify_rule_based() {
        let c = classifier();
        assert_eq!(c.classify("hi").unwrap().tier, Tier::RuleBased);
        assert_eq!(c.classify("  hello  ").unwrap().tier, Tier::RuleBased);
        assert_eq!(c.classify("what is 2 + 2").unwrap().tier, Tier::RuleBased);
        assert_eq!(c.classify("what time is it").unwrap().tier, Tier::RuleBased);
    }

    #[test]
    fn bounded_factual_queries_classify_local() {
        let c = classifier();
        assert_eq!(
            c.classify("explain machine learning").unwrap().tier,
            Tier::Local
        );
        assert_eq!(c.classify("who created Python").unwrap().tier, Tier::Local);
    }

    #[test]
    fn depth_requests_classify_cloud() {
        let c = classifier();
        let decision = c
            .classify("write a detailed analysis of quantum computing")
            .unwrap();
        assert_eq!(decision.tier, Tier::Cloud);
        assert_eq!(decision.reason, "depth indicator");

        assert_eq!(
            c.classify("compare and contrast TCP and UDP").unwrap().tier,
            Tier::Cloud
        );
        assert_eq!(
            c.classify("write code for a binary search").unwrap().tier,
            Tier::Cloud
        );
    }

    #[test]
    fn long_queries_classify_cloud() {
        let c = classifier();
        let long = "word ".repeat(41);
        let decision = c.classify(&long).unwrap();
        assert_eq!(decision.tier, Tier::Cloud);
        assert_eq!(decision.reason, "word count above cloud threshold");
    }

    #[test]
    fn empty_input_is_an_error_not_a_tier() {
        let c = classifier();
        assert!(matches!(c.classify(""), Err(VerdaError::EmptyPrompt)));
        assert!(matches!(c.classify("   "), Err(VerdaError::EmptyPrompt)));
        assert!(matches!(c.classify("\t\n"), Err(VerdaError::EmptyPrompt)));
    }

    #[test]
    fn disabled_local_tier_routes_to_cloud() {
        let config = RoutingConfig {
            local_enabled: false,
            ..RoutingConfig::default()
        };
        let c = Classifier::new(&config);

        // Would be local with the tier enabled.
        let decision = c.classify("explain machine learning").unwrap();
        assert_eq!(decision.tier, Tier::Cloud);
        assert_eq!(decision.reason, "local tier disabled");

        // The rule table still wins: no model needed at all.
        assert_eq!(c.classify("hi").unwrap().tier, Tier::RuleBased);
    }

    #[test]
    fn classification_is_deterministic() {
        let c = classifier();
        for _ in 0..10 {
            let a = c.classify("explain machine learning").unwrap();
            let b = c.classify("explain machine learning").unwrap();
            assert_eq!(a.tier, b.tier);
            assert_eq!(a.reason, b.reason);
        }
    }

    #[test]
    fn rule_table_wins_over_length() {
        // Arithmetic stays rule-based even when the threshold is tiny.
        let config = RoutingConfig {
            cloud_word_threshold: 2,
            ..RoutingConfig::default()
        };
        let c = Classifier::new(&config);
        assert_eq!(c.classify("what is 2 + 2").unwrap().tier, Tier::RuleBased);
    }
}
