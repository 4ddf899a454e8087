// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI embeddings client.
//!
//! Requests a fixed dimensionality on every call; every embedding in a
//! deployment must have the same length or similarity math degrades to the
//! zero score.

use async_trait::async_trait;
use tracing::debug;

use solace_config::model::OpenAiConfig;
use solace_core::error::{ProviderErrorKind, SolaceError};
use solace_core::traits::EmbeddingProvider;

use crate::chat::{build_http_client, error_from_response, transport_error, API_BASE_URL};
use crate::types::{EmbeddingRequest, EmbeddingResponse};

/// HTTP client for OpenAI embeddings.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingClient {
    client: reqwest::Client,
    model: String,
    dimensions: usize,
    base_url: String,
}

impl OpenAiEmbeddingClient {
    /// Creates a new embeddings client producing `dimensions`-length vectors.
    pub fn new(
        api_key: String,
        config: &OpenAiConfig,
        dimensions: usize,
    ) -> Result<Self, SolaceError> {
        Ok(Self {
            client: build_http_client(&api_key)?,
            model: config.embedding_model.clone(),
            dimensions,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingClient {
    fn name(&self) -> &str {
        "openai-embeddings"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, SolaceError> {
        let body = EmbeddingRequest {
            model: self.model.clone(),
            input: text.to_string(),
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "embedding response received");
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let parsed: EmbeddingResponse =
            response.json().await.map_err(|e| SolaceError::Provider {
                message: format!("failed to parse API response: {e}"),
                kind: ProviderErrorKind::Fatal,
                source: Some(Box::new(e)),
            })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| SolaceError::Provider {
                message: "embedding response carried no data".to_string(),
                kind: ProviderErrorKind::Fatal,
                source: None,
            })?;

        if embedding.len() != self.dimensions {
            return Err(SolaceError::Provider {
                message: format!(
                    "embedding dimensionality mismatch: wanted {}, got {}",
                    self.dimensions,
                    embedding.len()
                ),
                kind: ProviderErrorKind::Fatal,
                source: None,
            });
        }
        Ok(embedding)
    }
}
