// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry/failover state machine over a primary and secondary provider.
//!
//! The chain is fixed: primary with bounded retries, secondary once, then the
//! static fallback. `generate_text` and `generate_json` never error; callers
//! always get something usable. Provider clients classify errors but do not
//! retry; all retry policy lives here.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use solace_config::model::GenerationConfig;
use solace_core::error::{ProviderErrorKind, SolaceError};
use solace_core::traits::GenerationProvider;
use solace_core::types::{CompletionRequest, CompletionResponse};

use crate::fallback;
use crate::json::parse_json_object;

/// System prompt for JSON-mode requests.
const JSON_SYSTEM_PROMPT: &str = "You are a helpful assistant that responds with valid JSON only. \
     Do not include any text outside the JSON structure.";

/// Where the state machine is in the provider chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Primary provider, 1-based attempt counter.
    TryPrimary { attempt: u32 },
    TrySecondary,
    Fallback,
}

/// How a single provider attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    /// Provider returned empty or whitespace-only output.
    Empty,
    /// Provider returned output the mode could not accept (JSON parse failure).
    Invalid,
    Failed(ProviderErrorKind),
}

/// Record of one provider attempt, for observability and tests.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub provider: String,
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Orchestrates generation across the provider chain.
pub struct GenerationOrchestrator {
    primary: Arc<dyn GenerationProvider>,
    secondary: Option<Arc<dyn GenerationProvider>>,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        primary: Arc<dyn GenerationProvider>,
        secondary: Option<Arc<dyn GenerationProvider>>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
        }
    }

    /// Generates free text for the prompt. Never fails.
    pub async fn generate_text(&self, prompt: &str) -> String {
        self.generate_text_with_attempts(prompt).await.0
    }

    /// Like [`generate_text`](Self::generate_text), also returning the
    /// per-attempt trace.
    pub async fn generate_text_with_attempts(&self, prompt: &str) -> (String, Vec<GenerationAttempt>) {
        let request = CompletionRequest {
            prompt: prompt.to_string(),
            system: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        self.run(
            request,
            |text| {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            },
            fallback::contextual_reply,
        )
        .await
    }

    /// Generates a JSON object for the prompt. Never fails: if every provider
    /// attempt ends in failure or unparseable output, a pattern-based
    /// extraction stub is returned instead.
    pub async fn generate_json(&self, prompt: &str) -> serde_json::Value {
        self.generate_json_with_attempts(prompt).await.0
    }

    /// Like [`generate_json`](Self::generate_json), also returning the
    /// per-attempt trace.
    pub async fn generate_json_with_attempts(
        &self,
        prompt: &str,
    ) -> (serde_json::Value, Vec<GenerationAttempt>) {
        let request = CompletionRequest {
            prompt: prompt.to_string(),
            system: Some(JSON_SYSTEM_PROMPT.to_string()),
            max_tokens: self.config.json_max_tokens,
            temperature: self.config.json_temperature,
        };
        self.run(request, parse_json_object, fallback::extraction_stub)
            .await
    }

    async fn run<T>(
        &self,
        request: CompletionRequest,
        validate: impl Fn(&str) -> Option<T>,
        fallback: impl FnOnce(&str) -> T,
    ) -> (T, Vec<GenerationAttempt>) {
        let mut attempts = Vec::new();
        let mut state = State::TryPrimary { attempt: 1 };

        loop {
            match state {
                State::TryPrimary { attempt } => {
                    debug!(provider = %self.primary.name(), attempt, "attempting primary provider");
                    let outcome = self
                        .attempt(self.primary.as_ref(), request.clone(), &validate)
                        .await;
                    match outcome {
                        Ok(value) => {
                            attempts.push(GenerationAttempt {
                                provider: self.primary.name().to_string(),
                                attempt,
                                outcome: AttemptOutcome::Success,
                            });
                            return (value, attempts);
                        }
                        Err(outcome) => {
                            attempts.push(GenerationAttempt {
                                provider: self.primary.name().to_string(),
                                attempt,
                                outcome: outcome.clone(),
                            });
                            state = self.next_primary_state(attempt, &outcome).await;
                        }
                    }
                }
                State::TrySecondary => {
                    let Some(secondary) = self.secondary.as_deref() else {
                        state = State::Fallback;
                        continue;
                    };
                    metrics::counter!("solace_generation_failover_total").increment(1);
                    info!(provider = %secondary.name(), "failing over to secondary provider");
                    let outcome = self.attempt(secondary, request.clone(), &validate).await;
                    match outcome {
                        Ok(value) => {
                            attempts.push(GenerationAttempt {
                                provider: secondary.name().to_string(),
                                attempt: 1,
                                outcome: AttemptOutcome::Success,
                            });
                            return (value, attempts);
                        }
                        Err(outcome) => {
                            attempts.push(GenerationAttempt {
                                provider: secondary.name().to_string(),
                                attempt: 1,
                                outcome,
                            });
                            state = State::Fallback;
                        }
                    }
                }
                State::Fallback => {
                    metrics::counter!("solace_generation_fallback_total").increment(1);
                    warn!("all providers exhausted, using static fallback");
                    return (fallback(&request.prompt), attempts);
                }
            }
        }
    }

    /// Runs one provider call under the request timeout and validates the
    /// output.
    async fn attempt<T>(
        &self,
        provider: &dyn GenerationProvider,
        request: CompletionRequest,
        validate: &impl Fn(&str) -> Option<T>,
    ) -> Result<T, AttemptOutcome> {
        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let result: Result<CompletionResponse, SolaceError> =
            match tokio::time::timeout(timeout, provider.complete(request)).await {
                Ok(result) => result,
                Err(_) => Err(SolaceError::Timeout { duration: timeout }),
            };

        match result {
            Ok(response) => {
                if response.text.trim().is_empty() {
                    warn!(provider = %provider.name(), "provider returned empty output");
                    return Err(AttemptOutcome::Empty);
                }
                match validate(&response.text) {
                    Some(value) => Ok(value),
                    None => {
                        warn!(provider = %provider.name(), "provider output failed validation");
                        Err(AttemptOutcome::Invalid)
                    }
                }
            }
            Err(err) => {
                let kind = err.provider_kind();
                warn!(provider = %provider.name(), %err, ?kind, "provider call failed");
                Err(AttemptOutcome::Failed(kind))
            }
        }
    }

    /// Decides where the machine goes after a failed primary attempt, sleeping
    /// the backoff when another primary attempt follows.
    async fn next_primary_state(&self, attempt: u32, outcome: &AttemptOutcome) -> State {
        // Rate limits will not clear within the backoff window, and fatal
        // errors will not change on retry; both skip straight to secondary.
        if matches!(
            outcome,
            AttemptOutcome::Failed(ProviderErrorKind::RateLimited)
                | AttemptOutcome::Failed(ProviderErrorKind::Fatal)
        ) {
            debug!(attempt, "skipping remaining primary retries");
            return State::TrySecondary;
        }

        if attempt < self.config.max_attempts {
            let backoff =
                Duration::from_millis(self.config.base_backoff_ms << (attempt - 1).min(16));
            debug!(attempt, backoff_ms = backoff.as_millis() as u64, "retrying primary");
            tokio::time::sleep(backoff).await;
            State::TryPrimary {
                attempt: attempt + 1,
            }
        } else {
            State::TrySecondary
        }
    }
}
