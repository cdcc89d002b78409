// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP service boundary for the Verda hybrid query router.
//!
//! Exposes three endpoints to the mobile client:
//! - `POST /chat` routes a prompt through the tier router
//! - `GET /stats` reports the impact ledger
//! - `GET /health` reports service mode and local model availability
//!
//! CORS is permissive: the client is a mobile app talking across origins.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, HealthState};
