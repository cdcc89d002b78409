// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based tier backend for the Verda hybrid query router.
//!
//! A prioritized, data-driven pattern table resolves trivial intents
//! (greetings, time/date requests, simple arithmetic) without any model
//! invocation. New rules are added to the table; the router's control flow
//! never changes.

pub mod calc;
pub mod handler;
pub mod table;

pub use handler::RuleBasedHandler;
pub use table::{Rule, RuleTable};
