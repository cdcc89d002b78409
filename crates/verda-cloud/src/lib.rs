// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud model tier backend for the Verda hybrid query router.
//!
//! Talks to an OpenRouter-compatible chat-completions API under a hard
//! timeout. The cloud tier is terminal: its failures are classified
//! (timeout, upstream error, unreachable) and surfaced to the caller,
//! never escalated further.

pub mod client;

pub use client::CloudClient;
