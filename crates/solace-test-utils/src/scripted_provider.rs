// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted generation provider for deterministic orchestrator testing.
//!
//! Outcomes are popped from a FIFO queue. When the queue is empty, a default
//! "mock response" text is returned. A call counter lets tests assert exactly
//! how many attempts reached the provider.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::error::{ProviderErrorKind, SolaceError};
use solace_core::traits::GenerationProvider;
use solace_core::types::{CompletionRequest, CompletionResponse, TokenUsage};

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Succeed with the given text.
    Text(String),
    /// Succeed with empty output (the orchestrator treats this as failure).
    Empty,
    /// Fail with a rate-limit/quota error.
    RateLimited,
    /// Fail with a transient error (timeout, 5xx).
    Transient,
    /// Fail with a fatal error.
    Fatal,
}

/// A generation provider that replays a scripted sequence of outcomes.
pub struct ScriptedProvider {
    name: String,
    outcomes: Arc<Mutex<VecDeque<ScriptedOutcome>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    /// Create a provider with an empty script (every call succeeds with
    /// "mock response").
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider pre-loaded with the given outcomes.
    pub fn with_outcomes(name: impl Into<String>, outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            name: name.into(),
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append an outcome to the script.
    pub async fn push(&self, outcome: ScriptedOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of completion calls that reached this provider.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> ScriptedOutcome {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| ScriptedOutcome::Text("mock response".to_string()))
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SolaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_outcome().await {
            ScriptedOutcome::Text(text) => Ok(CompletionResponse {
                text,
                model: format!("{}-model", self.name),
                usage: TokenUsage {
                    input_tokens: request.prompt.len() as u32 / 4,
                    output_tokens: 20,
                },
            }),
            ScriptedOutcome::Empty => Ok(CompletionResponse {
                text: String::new(),
                model: format!("{}-model", self.name),
                usage: TokenUsage::default(),
            }),
            ScriptedOutcome::RateLimited => Err(SolaceError::Provider {
                message: "quota exceeded".into(),
                kind: ProviderErrorKind::RateLimited,
                source: None,
            }),
            ScriptedOutcome::Transient => Err(SolaceError::Provider {
                message: "service unavailable".into(),
                kind: ProviderErrorKind::Transient,
                source: None,
            }),
            ScriptedOutcome::Fatal => Err(SolaceError::Provider {
                message: "invalid request".into(),
                kind: ProviderErrorKind::Fatal,
                source: None,
            }),
        }
    }
}
