// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `TierHandler` implementation backed by the rule table.

use async_trait::async_trait;
use tracing::debug;

use verda_core::{AnswerResult, Tier, TierHandler, VerdaError};

use crate::table::RuleTable;

/// Rule-based tier backend: pattern lookup, no model invocation.
///
/// The router only dispatches here after the classifier confirmed a rule
/// match, so a miss is a routing bug, not a runtime condition -- the
/// handler reports it as a `RoutingFault` instead of silently escalating.
#[derive(Default)]
pub struct RuleBasedHandler {
    table: RuleTable,
}

impl RuleBasedHandler {
    /// Create a handler over the standard rule table.
    pub fn new() -> Self {
        Self {
            table: RuleTable::new(),
        }
    }
}

#[async_trait]
impl TierHandler for RuleBasedHandler {
    fn tier(&self) -> Tier {
        Tier::RuleBased
    }

    async fn handle(&self, query: &str) -> Result<AnswerResult, VerdaError> {
        let rule = self.table.find(query).ok_or_else(|| {
            VerdaError::RoutingFault(format!(
                "rule-based tier dispatched for a query no rule pattern covers: {query:?}"
            ))
        })?;

        let text = (rule.respond)(query).ok_or_else(|| {
            VerdaError::RoutingFault(format!(
                "rule pattern `{}` matched but produced no answer",
                rule.name
            ))
        })?;

        debug!(rule = rule.name, "rule table answered");
        Ok(AnswerResult::ok(text, Tier::RuleBased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greeting_answers_with_zero_tokens() {
        let handler = RuleBasedHandler::new();
        let result = handler.handle("hi").await.unwrap();
        assert_eq!(result.tier, Tier::RuleBased);
        assert_eq!(result.tokens_used, 0);
        assert!(result.succeeded);
        assert!(!result.text.is_empty());
    }

    #[tokio::test]
    async fn arithmetic_answers_the_value() {
        let handler = RuleBasedHandler::new();
        let result = handler.handle("what is 6 * 7").await.unwrap();
        assert_eq!(result.text, "42");
    }

    #[tokio::test]
    async fn unmatched_query_is_a_routing_fault() {
        let handler = RuleBasedHandler::new();
        let err = handler
            .handle("explain quantum computing")
            .await
            .unwrap_err();
        assert!(matches!(err, VerdaError::RoutingFault(_)));
        assert_eq!(err.category(), "routing-fault");
    }
}
