// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini generateContent API.
//!
//! The client classifies failures for the fallback chain but performs no
//! retries of its own; retry policy lives in the generation orchestrator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use solace_config::model::GeminiConfig;
use solace_core::error::{ProviderErrorKind, SolaceError};
use solace_core::traits::GenerationProvider;
use solace_core::types::{CompletionRequest, CompletionResponse, TokenUsage};

use crate::types::{
    default_safety_settings, ApiErrorResponse, Content, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part,
};

/// Base URL for the Gemini API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    top_p: f32,
    top_k: u32,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    pub fn new(api_key: String, config: &GeminiConfig) -> Result<Self, SolaceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key)
                .map_err(|e| SolaceError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SolaceError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                kind: ProviderErrorKind::Fatal,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: config.model.clone(),
            top_p: config.top_p,
            top_k: config.top_k,
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

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn build_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: request.system.as_ref().map(|system| Content {
                role: None,
                parts: vec![Part {
                    text: system.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
                top_p: self.top_p,
                top_k: self.top_k,
            },
            safety_settings: default_safety_settings(),
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SolaceError> {
        let body = self.build_request(&request);
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| SolaceError::Provider {
                message: format!("HTTP request failed: {e}"),
                kind: if e.is_timeout() || e.is_connect() {
                    ProviderErrorKind::Transient
                } else {
                    ProviderErrorKind::Fatal
                },
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (message, quota) = match serde_json::from_str::<ApiErrorResponse>(&text) {
                Ok(api_err) => {
                    let quota = api_err.error.status == "RESOURCE_EXHAUSTED";
                    (
                        format!(
                            "Gemini API error ({} {}): {}",
                            api_err.error.code, api_err.error.status, api_err.error.message
                        ),
                        quota,
                    )
                }
                Err(_) => (format!("API returned {status}: {text}"), false),
            };
            let kind = classify_status(status.as_u16(), quota);
            return Err(SolaceError::Provider {
                message,
                kind,
                source: None,
            });
        }

        let text = response.text().await.map_err(|e| SolaceError::Provider {
            message: format!("failed to read response body: {e}"),
            kind: ProviderErrorKind::Transient,
            source: Some(Box::new(e)),
        })?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| SolaceError::Provider {
                message: format!("failed to parse API response: {e}"),
                kind: ProviderErrorKind::Fatal,
                source: Some(Box::new(e)),
            })?;

        let usage = parsed
            .usage_metadata
            .as_ref()
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        // Safety-blocked or empty candidates read as empty text; the
        // orchestrator treats that as a failed attempt.
        Ok(CompletionResponse {
            text: parsed.text(),
            model: parsed.model_version.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }
}

/// Maps an HTTP error status to its fallback-chain classification.
fn classify_status(status: u16, quota_exhausted: bool) -> ProviderErrorKind {
    if status == 429 || quota_exhausted {
        ProviderErrorKind::RateLimited
    } else if status >= 500 {
        ProviderErrorKind::Transient
    } else {
        ProviderErrorKind::Fatal
    }
}
