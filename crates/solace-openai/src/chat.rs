// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions client, the secondary generation provider.
//!
//! Like the Gemini client this classifies failures and never retries;
//! retry policy lives in the orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use solace_config::model::OpenAiConfig;
use solace_core::error::{ProviderErrorKind, SolaceError};
use solace_core::traits::GenerationProvider;
use solace_core::types::{CompletionRequest, CompletionResponse, TokenUsage};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Base URL for the OpenAI API.
pub(crate) const API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default system message for the secondary provider when the request
/// carries none of its own.
const DEFAULT_SYSTEM: &str =
    "You are a helpful and empathetic AI companion. Respond naturally and supportively.";

/// HTTP client for OpenAI chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

pub(crate) fn build_http_client(api_key: &str) -> Result<reqwest::Client, SolaceError> {
    let mut headers = HeaderMap::new();
    let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|e| SolaceError::Config(format!("invalid API key header value: {e}")))?;
    auth.set_sensitive(true);
    headers.insert("authorization", auth);
    headers.insert("content-type", HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| SolaceError::Provider {
            message: format!("failed to build HTTP client: {e}"),
            kind: ProviderErrorKind::Fatal,
            source: Some(Box::new(e)),
        })
}

/// Reads an error body into a classified provider error.
pub(crate) async fn error_from_response(
    response: reqwest::Response,
) -> SolaceError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let (message, quota) = match serde_json::from_str::<ApiErrorResponse>(&text) {
        Ok(api_err) => (
            format!("OpenAI API error ({}): {}", api_err.error.type_, api_err.error.message),
            api_err.error.type_ == "insufficient_quota",
        ),
        Err(_) => (format!("API returned {status}: {text}"), false),
    };
    let kind = if status == 429 || quota {
        ProviderErrorKind::RateLimited
    } else if status >= 500 {
        ProviderErrorKind::Transient
    } else {
        ProviderErrorKind::Fatal
    };
    SolaceError::Provider {
        message,
        kind,
        source: None,
    }
}

pub(crate) fn transport_error(e: reqwest::Error) -> SolaceError {
    SolaceError::Provider {
        message: format!("HTTP request failed: {e}"),
        kind: if e.is_timeout() || e.is_connect() {
            ProviderErrorKind::Transient
        } else {
            ProviderErrorKind::Fatal
        },
        source: Some(Box::new(e)),
    }
}

impl OpenAiChatClient {
    /// Creates a new chat-completions client.
    pub fn new(api_key: String, config: &OpenAiConfig) -> Result<Self, SolaceError> {
        Ok(Self {
            client: build_http_client(&api_key)?,
            model: config.chat_model.clone(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Returns the model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl GenerationProvider for OpenAiChatClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SolaceError> {
        let system = request
            .system
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM.to_string());
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "chat completion response received");
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| SolaceError::Provider {
                message: format!("failed to parse API response: {e}"),
                kind: ProviderErrorKind::Fatal,
                source: Some(Box::new(e)),
            })?;

        let usage = parsed
            .usage
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();
        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse {
            text,
            model: parsed.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiChatClient {
        OpenAiChatClient::new("test-api-key".into(), &OpenAiConfig::default())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Hello".into(),
            system: None,
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
            "model": "gpt-4o-mini",
            "usage": {"prompt_tokens": 7, "completion_tokens": 3}
        })
    }

    #[tokio::test]
    async fn complete_success_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Hi!")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();
        assert_eq!(result.text, "Hi!");
        assert_eq!(result.usage.output_tokens, 3);
    }

    #[tokio::test]
    async fn default_system_message_applied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "system", "content": DEFAULT_SYSTEM}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        assert!(client.complete(test_request()).await.is_ok());
    }

    #[tokio::test]
    async fn explicit_system_message_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "system", "content": "JSON only"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("{}")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let request = CompletionRequest {
            system: Some("JSON only".into()),
            ..test_request()
        };
        assert!(client.complete(request).await.is_ok());
    }

    #[tokio::test]
    async fn quota_error_classified_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "You exceeded your quota", "type": "insufficient_quota"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), ProviderErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn server_error_classified_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(test_request()).await.unwrap_err();
        assert_eq!(err.provider_kind(), ProviderErrorKind::Transient);
    }

    #[tokio::test]
    async fn empty_choices_yield_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [], "model": "gpt-4o-mini"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(test_request()).await.unwrap();
        assert_eq!(result.text, "");
    }
}
