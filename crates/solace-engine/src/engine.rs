// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The engine facade.

use std::sync::Arc;

use tokio_rusqlite::Connection;
use tracing::info;

use solace_config::model::SolaceConfig;
use solace_core::error::SolaceError;
use solace_core::traits::{EmbeddingProvider, GenerationProvider};
use solace_core::types::ChatTurn;
use solace_memory::store::interaction_summary;
use solace_memory::{
    ExtractionResult, FactExtractor, MemoryRecord, MemoryRetriever, MemoryStore, RankedMemory,
};
use solace_prompt::{clean, PromptAssembler, UserProfile};
use solace_resilience::GenerationOrchestrator;

/// The assembled memory and generation core.
pub struct Engine {
    store: Arc<MemoryStore>,
    retriever: MemoryRetriever,
    extractor: FactExtractor,
    orchestrator: Arc<GenerationOrchestrator>,
    assembler: PromptAssembler,
    embedder: Arc<dyn EmbeddingProvider>,
    default_search_limit: usize,
}

impl Engine {
    /// Wires the core over an open database connection and injected
    /// providers, creating the schema if needed.
    pub async fn new(
        conn: Connection,
        config: SolaceConfig,
        primary: Arc<dyn GenerationProvider>,
        secondary: Option<Arc<dyn GenerationProvider>>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, SolaceError> {
        config.validate()?;

        let store = Arc::new(MemoryStore::new(conn, config.memory.clone()));
        store.init_schema().await?;

        let orchestrator = Arc::new(GenerationOrchestrator::new(
            primary,
            secondary,
            config.generation.clone(),
        ));
        let retriever = MemoryRetriever::new(store.clone(), embedder.clone());
        let extractor = FactExtractor::new(
            store.clone(),
            embedder.clone(),
            orchestrator.clone(),
            config.memory.source_message_max_len,
            config.memory.summary_max_len,
        );
        let assembler = PromptAssembler::new(config.prompt.clone());

        info!(persona = %config.prompt.persona_name, "engine initialized");
        Ok(Self {
            store,
            retriever,
            extractor,
            orchestrator,
            assembler,
            embedder,
            default_search_limit: config.memory.default_search_limit,
        })
    }

    /// Extracts memorable information from one user message. Never fails.
    pub async fn extract(&self, message: &str) -> ExtractionResult {
        self.extractor.extract(message).await
    }

    /// Persists the extracted items as memory records.
    pub async fn remember(
        &self,
        user_id: &str,
        message: &str,
        result: &ExtractionResult,
        conversation_id: Option<&str>,
    ) -> Vec<MemoryRecord> {
        self.extractor
            .remember(user_id, message, result, conversation_id)
            .await
    }

    /// Records the rolling interaction summary for one exchange and prunes
    /// interaction records past the retention cap.
    pub async fn write_interaction(
        &self,
        user_id: &str,
        user_message: &str,
        assistant_reply: &str,
        conversation_id: Option<&str>,
    ) -> Result<MemoryRecord, SolaceError> {
        let summary = interaction_summary(user_message, assistant_reply);
        let embedding = self.embedder.embed(&summary).await?;
        self.store
            .write_interaction(user_id, user_message, assistant_reply, &embedding, conversation_id)
            .await
    }

    /// Searches the user's memories with the configured default limit.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<RankedMemory>, SolaceError> {
        self.retriever
            .search(user_id, query, self.default_search_limit, None)
            .await
    }

    /// Searches with an explicit limit and optional metadata filter.
    pub async fn search_with(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        filter: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Vec<RankedMemory>, SolaceError> {
        self.retriever.search(user_id, query, limit, filter).await
    }

    /// Generates free text through the resilient provider chain. Never fails.
    pub async fn generate_text(&self, prompt: &str) -> String {
        self.orchestrator.generate_text(prompt).await
    }

    /// Generates a JSON object through the resilient provider chain.
    /// Never fails.
    pub async fn generate_json(&self, prompt: &str) -> serde_json::Value {
        self.orchestrator.generate_json(prompt).await
    }

    /// Assembles the generation prompt for one chat turn.
    pub fn build_prompt(
        &self,
        message: &str,
        sentiment: &str,
        memories: &[RankedMemory],
        profile: &UserProfile,
        history: &[ChatTurn],
        has_memories: bool,
    ) -> String {
        self.assembler
            .build(message, sentiment, memories, profile, history, has_memories)
    }

    /// Post-processes a generated reply.
    pub fn clean(&self, response: &str, history: &[ChatTurn]) -> String {
        clean(response, history)
    }
}
