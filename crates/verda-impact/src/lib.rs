// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environmental impact accounting for the Verda hybrid query router.
//!
//! This crate provides:
//! - **Impact ledger**: process-wide, lock-guarded totals of responses by
//!   tier and resources saved by answering below the cloud tier
//! - **Report**: the human-readable summary served by `/stats`
//!
//! The ledger is dependency-injected rather than a module-level singleton,
//! so tests instantiate isolated ledgers per case.

pub mod ledger;
pub mod report;

pub use ledger::{ImpactLedger, ImpactStats};
