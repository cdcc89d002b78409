// SPDX-FileCopyrightText: 2026 Verda Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The cloud inference API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use verda_config::model::CloudConfig;
use verda_core::{AnswerResult, Tier, TierHandler, VerdaError};

/// Maximum upstream error body length carried into error messages.
const ERROR_BODY_LIMIT: usize = 200;

/// Request body for the chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from the chat-completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Client for an OpenRouter-compatible chat-completions API.
pub struct CloudClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl CloudClient {
    /// Create a client from configuration.
    ///
    /// Requires an API key: the cloud tier is the terminal fallback, so
    /// the service refuses to start without it.
    pub fn new(config: &CloudConfig) -> Result<Self, VerdaError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                VerdaError::Config(
                    "cloud.api_key is required (set via config or VERDA_CLOUD_API_KEY)"
                        .to_string(),
                )
            })?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerdaError::Internal(format!("failed to build cloud client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout,
        })
    }
}

#[async_trait]
impl TierHandler for CloudClient {
    fn tier(&self) -> Tier {
        Tier::Cloud
    }

    async fn handle(&self, query: &str) -> Result<AnswerResult, VerdaError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: query,
            }],
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerdaError::UpstreamTimeout {
                        duration: self.timeout,
                    }
                } else {
                    VerdaError::Unreachable {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            body.truncate(ERROR_BODY_LIMIT);
            return Err(VerdaError::UpstreamError {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = resp.json().await.map_err(|e| VerdaError::UpstreamError {
            status: status.as_u16(),
            message: format!("unparseable response: {e}"),
        })?;

        let answer = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| VerdaError::UpstreamError {
                status: status.as_u16(),
                message: "response contained no choices".to_string(),
            })?;

        // Upstreams occasionally omit usage; fall back to the request cap.
        let tokens = parsed
            .usage
            .map(|u| u.total_tokens)
            .unwrap_or(self.max_tokens);

        debug!(model = self.model.as_str(), tokens, "cloud inference complete");
        Ok(AnswerResult::with_tokens(answer, Tier::Cloud, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str, timeout_secs: u64) -> CloudConfig {
        CloudConfig {
            api_key: Some("test-key".to_string()),
            base_url: base_url.to_string(),
            model: "test/model".to_string(),
            max_tokens: 150,
            timeout_secs,
        }
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = CloudConfig::default();
        let err = CloudClient::new(&config).unwrap_err();
        assert!(matches!(err, VerdaError::Config(_)));
    }

    #[tokio::test]
    async fn successful_completion_carries_token_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(bearer_token("test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Quantum computing uses qubits."}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 30, "total_tokens": 42}
            })))
            .mount(&server)
            .await;

        let client = CloudClient::new(&test_config(&server.uri(), 5)).unwrap();
        let result = client.handle("explain quantum computing").await.unwrap();

        assert_eq!(result.tier, Tier::Cloud);
        assert_eq!(result.tokens_used, 42);
        assert_eq!(result.text, "Quantum computing uses qubits.");
    }

    #[tokio::test]
    async fn missing_usage_falls_back_to_request_cap() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "answer"}}]
            })))
            .mount(&server)
            .await;

        let client = CloudClient::new(&test_config(&server.uri(), 5)).unwrap();
        let result = client.handle("question").await.unwrap();
        assert_eq!(result.tokens_used, 150);
    }

    #[tokio::test]
    async fn upstream_5xx_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = CloudClient::new(&test_config(&server.uri(), 5)).unwrap();
        let err = client.handle("question").await.unwrap_err();
        match err {
            VerdaError::UpstreamError { status, message } => {
                assert_eq!(status, 502);
                assert!(message.contains("bad gateway"));
            }
            other => panic!("expected UpstreamError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = CloudClient::new(&test_config(&server.uri(), 1)).unwrap();
        let err = client.handle("question").await.unwrap_err();
        assert!(matches!(err, VerdaError::UpstreamTimeout { .. }));
        assert_eq!(err.category(), "timeout");
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        let client = CloudClient::new(&test_config("http://127.0.0.1:9", 1)).unwrap();
        let err = client.handle("question").await.unwrap_err();
        assert!(matches!(err, VerdaError::Unreachable { .. }));
        assert_eq!(err.category(), "unreachable");
    }

    #[tokio::test]
    async fn empty_choices_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&server)
            .await;

        let client = CloudClient::new(&test_config(&server.uri(), 5)).unwrap();
        let err = client.handle("question").await.unwrap_err();
        assert!(matches!(err, VerdaError::UpstreamError { .. }));
    }
}
