// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Verda hybrid query router.

use thiserror::Error;

use crate::types::Tier;

/// The primary error type used across all Verda crates.
#[derive(Debug, Error)]
pub enum VerdaError {
    /// The prompt was empty or whitespace-only. Rejected before classification.
    #[error("empty prompt: a query must contain at least one non-whitespace character")]
    EmptyPrompt,

    /// A tier backend is not available (e.g. local runtime not loaded).
    /// Triggers escalation at non-terminal tiers, never surfaces to the caller.
    #[error("{tier} handler unavailable: {message}")]
    HandlerUnavailable {
        tier: Tier,
        message: String,
    },

    /// The cloud call exceeded its hard timeout. Terminal.
    #[error("cloud request timed out after {duration:?}")]
    UpstreamTimeout { duration: std::time::Duration },

    /// The cloud endpoint answered with a non-success status. Terminal.
    #[error("cloud upstream returned status {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// The cloud endpoint could not be reached at all. Terminal.
    #[error("cloud endpoint unreachable: {message}")]
    Unreachable { message: String },

    /// The router dispatched to a handler that cannot serve the query.
    /// Must not occur given a total classifier; logged and treated as cloud.
    #[error("routing fault: {0}")]
    RoutingFault(String),

    /// Configuration errors (invalid values, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VerdaError {
    /// Stable error category reported per failed `/chat` request.
    ///
    /// The mobile client keys its presentation off these strings, so they
    /// are part of the wire contract and must not change casually.
    pub fn category(&self) -> &'static str {
        match self {
            VerdaError::EmptyPrompt => "invalid-prompt",
            VerdaError::HandlerUnavailable { .. } => "unavailable",
            VerdaError::UpstreamTimeout { .. } => "timeout",
            VerdaError::UpstreamError { .. } => "upstream-error",
            VerdaError::Unreachable { .. } => "unreachable",
            VerdaError::RoutingFault(_) => "routing-fault",
            VerdaError::Config(_) => "config",
            VerdaError::Internal(_) => "internal",
        }
    }
}
