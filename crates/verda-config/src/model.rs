// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Verda hybrid query router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Verda configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VerdaConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Tier classification settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Local model runtime settings.
    #[serde(default)]
    pub local: LocalConfig,

    /// Cloud inference API settings.
    #[serde(default)]
    pub cloud: CloudConfig,

    /// Per-tier resource savings estimates.
    #[serde(default)]
    pub impact: ImpactConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "verda".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server bind configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Tier classification configuration.
///
/// Controls the escalating-cost-avoidance heuristic: queries below the word
/// threshold without depth indicators route to the local tier, everything
/// heavier routes to cloud. The rule table is data-driven and not configured
/// here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Enable the local model tier. When false, queries that would route
    /// local are classified straight to cloud.
    #[serde(default = "default_local_enabled")]
    pub local_enabled: bool,

    /// Word count above which a query is classified to the cloud tier.
    #[serde(default = "default_cloud_word_threshold")]
    pub cloud_word_threshold: usize,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            local_enabled: default_local_enabled(),
            cloud_word_threshold: default_cloud_word_threshold(),
        }
    }
}

fn default_local_enabled() -> bool {
    true
}

fn default_cloud_word_threshold() -> usize {
    40
}

/// Local model runtime configuration.
///
/// The local tier speaks the Ollama-compatible HTTP API of a machine-local
/// inference runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Base URL of the local runtime.
    #[serde(default = "default_local_base_url")]
    pub base_url: String,

    /// Model name to request from the runtime.
    #[serde(default = "default_local_model")]
    pub model: String,

    /// Maximum response length in tokens.
    #[serde(default = "default_local_max_response_tokens")]
    pub max_response_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_local_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_base_url(),
            model: default_local_model(),
            max_response_tokens: default_local_max_response_tokens(),
            timeout_secs: default_local_timeout_secs(),
        }
    }
}

fn default_local_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_local_model() -> String {
    "phi".to_string()
}

fn default_local_max_response_tokens() -> u32 {
    100
}

fn default_local_timeout_secs() -> u64 {
    30
}

/// Cloud inference API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CloudConfig {
    /// API key for the cloud endpoint. `None` requires the
    /// `VERDA_CLOUD_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the cloud inference API.
    #[serde(default = "default_cloud_base_url")]
    pub base_url: String,

    /// Model identifier to request.
    #[serde(default = "default_cloud_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_cloud_max_tokens")]
    pub max_tokens: u32,

    /// Hard timeout for the remote call in seconds.
    #[serde(default = "default_cloud_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_cloud_base_url(),
            model: default_cloud_model(),
            max_tokens: default_cloud_max_tokens(),
            timeout_secs: default_cloud_timeout_secs(),
        }
    }
}

fn default_cloud_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_cloud_model() -> String {
    "arcee-ai/trinity-large-preview:free".to_string()
}

fn default_cloud_max_tokens() -> u32 {
    150
}

fn default_cloud_timeout_secs() -> u64 {
    60
}

/// Per-tier resource savings estimates.
///
/// These are policy choices, not measurements: a rule-based answer is
/// credited with the full cost of the cloud call it avoided, a local answer
/// with the local-vs-cloud delta, and a cloud answer with nothing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactConfig {
    /// Tokens credited as saved per rule-based answer.
    #[serde(default = "default_rule_based_saved_tokens")]
    pub rule_based_saved_tokens: u32,

    /// Tokens credited as saved per local answer.
    #[serde(default = "default_local_saved_tokens")]
    pub local_saved_tokens: u32,

    /// Grams of CO2 attributed per token of cloud inference.
    #[serde(default = "default_co2_grams_per_token")]
    pub co2_grams_per_token: f64,

    /// Millilitres of cooling water attributed per avoided cloud call.
    #[serde(default = "default_water_ml_per_query")]
    pub water_ml_per_query: f64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            rule_based_saved_tokens: default_rule_based_saved_tokens(),
            local_saved_tokens: default_local_saved_tokens(),
            co2_grams_per_token: default_co2_grams_per_token(),
            water_ml_per_query: default_water_ml_per_query(),
        }
    }
}

fn default_rule_based_saved_tokens() -> u32 {
    150
}

fn default_local_saved_tokens() -> u32 {
    100
}

fn default_co2_grams_per_token() -> f64 {
    0.002
}

fn default_water_ml_per_query() -> f64 {
    25.0
}
