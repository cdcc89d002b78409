// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local model tier backend for the Verda hybrid query router.
//!
//! Speaks the Ollama-compatible HTTP API of a machine-local inference
//! runtime. The runtime is a single shared instance, so access is
//! serialized internally; the serialization mutex is never held together
//! with the impact ledger lock.

pub mod runtime;

pub use runtime::LocalRuntime;
