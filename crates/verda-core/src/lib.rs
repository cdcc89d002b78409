// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Verda hybrid query router.
//!
//! This crate provides the shared vocabulary of the workspace: the processing
//! tier enumeration, the classification and answer types that flow between
//! the classifier, the router, and the impact ledger, the error taxonomy,
//! and the [`TierHandler`] trait that every tier backend implements.

pub mod error;
pub mod handler;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VerdaError;
pub use handler::TierHandler;
pub use types::{AnswerResult, Tier, TierDecision};
