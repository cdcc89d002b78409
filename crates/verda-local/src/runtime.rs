// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The local inference runtime adapter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use verda_config::model::LocalConfig;
use verda_core::{AnswerResult, Tier, TierHandler, VerdaError};

/// Request body for the runtime's `/api/generate` endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Generation options; `num_predict` caps the response length.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

/// Response body from `/api/generate`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Response body from `/api/tags` (installed model listing).
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

/// Adapter for a machine-local inference runtime.
///
/// The runtime hosts one shared model instance; concurrent requests are
/// serialized through `gate` so interleaving is always safe regardless of
/// whether the runtime itself is reentrant.
pub struct LocalRuntime {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_response_tokens: u32,
    loaded: AtomicBool,
    gate: Mutex<()>,
}

impl LocalRuntime {
    /// Create a runtime adapter from configuration. Does not probe; call
    /// [`LocalRuntime::probe`] before serving to learn whether the model
    /// is actually available.
    pub fn new(config: &LocalConfig) -> Result<Self, VerdaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerdaError::Internal(format!("failed to build local client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_response_tokens: config.max_response_tokens,
            loaded: AtomicBool::new(false),
            gate: Mutex::new(()),
        })
    }

    /// Probe the runtime for the configured model and record the outcome.
    ///
    /// Returns whether the model is loaded. A probe failure is not an
    /// error: the service still serves the rule-based and cloud tiers.
    pub async fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        let loaded = match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<TagsResponse>().await {
                Ok(tags) => tags.models.iter().any(|m| {
                    m.name == self.model || m.name.starts_with(&format!("{}:", self.model))
                }),
                Err(e) => {
                    warn!(error = %e, "local runtime tag listing unparseable");
                    false
                }
            },
            Ok(resp) => {
                warn!(status = %resp.status(), "local runtime probe rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "local runtime unreachable");
                false
            }
        };

        self.loaded.store(loaded, Ordering::SeqCst);
        if loaded {
            info!(model = self.model.as_str(), "local model ready");
        } else {
            warn!(
                model = self.model.as_str(),
                "local model not available, local tier will escalate to cloud"
            );
        }
        loaded
    }

    /// Whether the last probe found the configured model.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    async fn generate(&self, query: &str) -> Result<String, VerdaError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: query,
            stream: false,
            options: GenerateOptions {
                num_predict: self.max_response_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VerdaError::HandlerUnavailable {
                tier: Tier::Local,
                message: format!("request failed: {e}"),
            })?;

        if !resp.status().is_success() {
            return Err(VerdaError::HandlerUnavailable {
                tier: Tier::Local,
                message: format!("runtime returned status {}", resp.status()),
            });
        }

        let generated: GenerateResponse =
            resp.json()
                .await
                .map_err(|e| VerdaError::HandlerUnavailable {
                    tier: Tier::Local,
                    message: format!("unparseable response: {e}"),
                })?;

        Ok(generated.response.trim().to_string())
    }
}

#[async_trait]
impl TierHandler for LocalRuntime {
    fn tier(&self) -> Tier {
        Tier::Local
    }

    async fn handle(&self, query: &str) -> Result<AnswerResult, VerdaError> {
        if !self.is_loaded() {
            return Err(VerdaError::HandlerUnavailable {
                tier: Tier::Local,
                message: "runtime not loaded".to_string(),
            });
        }

        // One shared model instance: serialize inference calls. The ledger
        // lock is only taken after this guard is released.
        let _guard = self.gate.lock().await;
        debug!(model = self.model.as_str(), "local inference start");
        let text = self.generate(query).await?;

        Ok(AnswerResult::ok(text, Tier::Local))
    }
}
