// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation provider trait for LLM integrations (Gemini, OpenAI, etc.).

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::types::{CompletionRequest, CompletionResponse};

/// A text-generation capability.
///
/// Implementations handle one provider's API and classify failures as
/// [`crate::error::ProviderErrorKind`] so the orchestrator can drive its
/// retry/fallback chain. Implementations do NOT retry internally.
#[async_trait]
pub trait GenerationProvider: Send + Sync + 'static {
    /// Human-readable provider name, used in attempt bookkeeping and logs.
    fn name(&self) -> &str;

    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, SolaceError>;
}
