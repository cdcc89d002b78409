// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Verda workspace.

use serde::{Deserialize, Serialize};
use strum::EnumString;

/// The three escalating processing tiers a query can be routed to.
///
/// The derived ordering is the escalation order: `RuleBased < Local < Cloud`.
/// Escalation only ever moves upward; [`Tier::next`] returns `None` at the
/// terminal tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Tier {
    /// Pattern-table lookup. No model invocation at all.
    RuleBased,
    /// Machine-local model runtime.
    Local,
    /// Remote inference API. Terminal: no further escalation.
    Cloud,
}

impl Tier {
    /// The next tier up, or `None` at the terminal tier.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::RuleBased => Some(Tier::Local),
            Tier::Local => Some(Tier::Cloud),
            Tier::Cloud => None,
        }
    }

    /// Whether this tier has no escalation target.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::RuleBased => write!(f, "rule-based"),
            Tier::Local => write!(f, "local"),
            Tier::Cloud => write!(f, "cloud"),
        }
    }
}

/// The classifier's verdict for one query.
///
/// Produced once per query, never mutated, consumed immediately by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDecision {
    /// The tier the query should be dispatched to.
    pub tier: Tier,
    /// Human-readable reason for the decision.
    pub reason: &'static str,
}

/// The outcome of a tier handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    /// The answer text.
    pub text: String,
    /// The tier that produced the answer.
    pub tier: Tier,
    /// Tokens consumed by the call. Zero for rule-based and local answers.
    pub tokens_used: u32,
    /// Whether the handler produced a usable answer.
    pub succeeded: bool,
}

impl AnswerResult {
    /// A successful answer with no token consumption.
    pub fn ok(text: impl Into<String>, tier: Tier) -> Self {
        Self {
            text: text.into(),
            tier,
            tokens_used: 0,
            succeeded: true,
        }
    }

    /// A successful answer with metered token consumption.
    pub fn with_tokens(text: impl Into<String>, tier: Tier, tokens_used: u32) -> Self {
        Self {
            text: text.into(),
            tier,
            tokens_used,
            succeeded: true,
        }
    }

    /// A failed outcome for the given tier, used for logging and tests.
    pub fn failed(tier: Tier) -> Self {
        Self {
            text: String::new(),
            tier,
            tokens_used: 0,
            succeeded: false,
        }
    }
}
