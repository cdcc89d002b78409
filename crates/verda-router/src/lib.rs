// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query routing for the Verda hybrid query router.
//!
//! The [`Classifier`] maps each query to the cheapest tier that can safely
//! answer it; the [`QueryRouter`] dispatches to the chosen handler and
//! escalates upward -- one step per failure, never downward, never in a
//! cycle -- recording every completed answer in the impact ledger.

pub mod classifier;
pub mod router;

pub use classifier::Classifier;
pub use router::QueryRouter;
