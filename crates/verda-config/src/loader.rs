// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./verda.toml` > `~/.config/verda/verda.toml` > `/etc/verda/verda.toml`
//! with environment variable overrides via `VERDA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VerdaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/verda/verda.toml` (system-wide)
/// 3. `~/.config/verda/verda.toml` (user XDG config)
/// 4. `./verda.toml` (local directory)
/// 5. `VERDA_*` environment variables
pub fn load_config() -> Result<VerdaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VerdaConfig::default()))
        .merge(Toml::file("/etc/verda/verda.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("verda/verda.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("verda.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VerdaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VerdaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VerdaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VerdaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VERDA_CLOUD_API_KEY` must map to
/// `cloud.api_key`, not `cloud.api.key`.
fn env_provider() -> Env {
    const SECTIONS: &[&str] = &["agent", "server", "routing", "local", "cloud", "impact"];

    Env::prefixed("VERDA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VERDA_CLOUD_API_KEY -> "cloud_api_key"
        let key_str = key.as_str();
        for section in SECTIONS {
            if let Some(rest) = key_str.strip_prefix(&format!("{section}_")) {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}
