// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive thresholds, and
//! non-negative savings estimates.

use crate::diagnostic::ConfigError;
use crate::model::VerdaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VerdaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate bind host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    // Validate classification threshold
    if config.routing.cloud_word_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.cloud_word_threshold must be at least 1".to_string(),
        });
    }

    // Validate local runtime settings when the local tier is enabled
    if config.routing.local_enabled {
        if config.local.base_url.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "local.base_url must not be empty when routing.local_enabled is true"
                    .to_string(),
            });
        }
        if config.local.model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "local.model must not be empty when routing.local_enabled is true"
                    .to_string(),
            });
        }
        if config.local.max_response_tokens == 0 {
            errors.push(ConfigError::Validation {
                message: "local.max_response_tokens must be at least 1".to_string(),
            });
        }
    }

    // Validate cloud settings (the terminal tier is always required)
    if config.cloud.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cloud.base_url must not be empty".to_string(),
        });
    }
    if config.cloud.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cloud.model must not be empty".to_string(),
        });
    }
    if config.cloud.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "cloud.timeout_secs must be at least 1".to_string(),
        });
    }

    // Validate savings estimates
    if config.impact.co2_grams_per_token < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "impact.co2_grams_per_token must be non-negative, got {}",
                config.impact.co2_grams_per_token
            ),
        });
    }
    if config.impact.water_ml_per_query < 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "impact.water_ml_per_query must be non-negative, got {}",
                config.impact.water_ml_per_query
            ),
        });
    }
    if config.impact.rule_based_saved_tokens < config.impact.local_saved_tokens {
        errors.push(ConfigError::Validation {
            message: format!(
                "impact.rule_based_saved_tokens ({}) must be at least impact.local_saved_tokens ({}): a rule-based answer avoids the whole cloud call",
                config.impact.rule_based_saved_tokens, config.impact.local_saved_tokens
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
