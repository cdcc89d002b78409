// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The adapter trait implemented by every processing tier backend.

use async_trait::async_trait;

use crate::error::VerdaError;
use crate::types::{AnswerResult, Tier};

/// A backend that can answer queries at one processing tier.
///
/// Handlers may fail independently; the router decides whether a failure
/// escalates to the next tier up or surfaces to the caller. A returned
/// `Ok` value always carries `succeeded = true`.
#[async_trait]
pub trait TierHandler: Send + Sync {
    /// The tier this handler serves.
    fn tier(&self) -> Tier;

    /// Answer the query at this tier.
    async fn handle(&self, query: &str) -> Result<AnswerResult, VerdaError>;
}
