// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dual-path fact extraction: regex floor plus AI pass, merged by union.
//!
//! The pattern floor always runs and can only be added to; a total provider
//! outage degrades extraction quality but never fails it. `remember` then
//! persists one record per extracted item, embedding each individually.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use solace_core::traits::EmbeddingProvider;
use solace_resilience::GenerationOrchestrator;

use crate::patterns::{extract_people, pattern_extract};
use crate::store::MemoryStore;
use crate::types::{
    truncate_chars, CategoryBag, ExtractionResult, InformationType, MemoryMetadata, MemoryRecord,
    Priority,
};

/// AI extraction response shape. Every field is defaulted; a model that
/// returns a partial object still contributes what it did return.
#[derive(Debug, Default, Deserialize)]
struct AiExtraction {
    #[serde(default)]
    has_meaningful_content: bool,
    #[serde(default)]
    information_type: InformationType,
    #[serde(default)]
    extracted_info: CategoryBag,
    #[serde(default)]
    key_entities: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    priority: Priority,
}

/// Extracts memorable information from user messages and persists it.
pub struct FactExtractor {
    store: Arc<MemoryStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    orchestrator: Arc<GenerationOrchestrator>,
    source_message_max_len: usize,
    summary_max_len: usize,
}

impl FactExtractor {
    pub fn new(
        store: Arc<MemoryStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        orchestrator: Arc<GenerationOrchestrator>,
        source_message_max_len: usize,
        summary_max_len: usize,
    ) -> Self {
        Self {
            store,
            embedder,
            orchestrator,
            source_message_max_len,
            summary_max_len,
        }
    }

    fn extraction_prompt(message: &str) -> String {
        format!(
            r#"Extract key information from this message. Return ONLY valid JSON:
{{
    "has_meaningful_content": true/false,
    "information_type": "relationship/fact/preference/situation/emotion/other",
    "extracted_info": {{
        "people": ["list of people with context"],
        "facts": ["facts about user"],
        "preferences": ["preferences mentioned"],
        "emotions": ["emotional states"],
        "situations": ["ongoing situations"]
    }},
    "key_entities": ["main topics"],
    "summary": "brief summary",
    "priority": "high/medium/low"
}}

Message: "{message}""#
        )
    }

    /// Extracts information from one message. Never fails: the pattern floor
    /// is the worst case, the AI pass the best case, their union the usual
    /// case.
    pub async fn extract(&self, message: &str) -> ExtractionResult {
        let mut result = pattern_extract(message);

        let ai_value = self
            .orchestrator
            .generate_json(&Self::extraction_prompt(message))
            .await;
        let ai: AiExtraction = match serde_json::from_value(ai_value) {
            Ok(ai) => ai,
            Err(err) => {
                warn!(%err, "AI extraction response did not match schema, keeping pattern results");
                return result;
            }
        };

        if ai.has_meaningful_content {
            result.extracted.merge(&ai.extracted_info);
            result.has_meaningful_content = true;
            result.information_type = ai.information_type;
            result.key_entities = ai.key_entities;
            result.priority = ai.priority;
            if !ai.summary.trim().is_empty() {
                result.summary = truncate_chars(ai.summary.trim(), self.summary_max_len);
            }
        }

        result
    }

    /// Persists one memory record per extracted item.
    ///
    /// Items that fail to embed or write are logged and skipped; the batch
    /// always completes. Returns the records actually written.
    pub async fn remember(
        &self,
        user_id: &str,
        message: &str,
        result: &ExtractionResult,
        conversation_id: Option<&str>,
    ) -> Vec<MemoryRecord> {
        if !result.has_meaningful_content {
            return Vec::new();
        }

        let people = extract_people(message);
        let source = truncate_chars(message, self.source_message_max_len);
        let mut written = Vec::new();

        for (kind, items) in result.extracted.iter() {
            for item in items {
                let item = item.trim();
                if item.is_empty() {
                    continue;
                }

                let embedding = match self.embedder.embed(item).await {
                    Ok(v) => v,
                    Err(err) => {
                        warn!(%err, item, "skipping memory item: embedding failed");
                        continue;
                    }
                };

                let mut metadata = MemoryMetadata::new(kind, result.priority);
                metadata.information_type = result.information_type;
                metadata.key_entities = result.key_entities.clone();
                metadata.source_message = Some(source.clone());
                metadata.conversation_id = conversation_id.map(str::to_string);
                if kind == crate::types::MemoryKind::Person {
                    metadata.person_name = detect_person_name(item, &people);
                }

                match self
                    .store
                    .write(user_id, item, &embedding, metadata, conversation_id)
                    .await
                {
                    Ok(record) => written.push(record),
                    Err(err) => {
                        warn!(%err, item, "skipping memory item: write failed");
                    }
                }
            }
        }

        debug!(user_id, count = written.len(), "remembered extracted items");
        written
    }
}

/// Person name for a people-entry: a leading title-case word, or a name the
/// relationship patterns found in the source message.
fn detect_person_name(
    item: &str,
    mentions: &[crate::patterns::PersonMention],
) -> Option<String> {
    if let Some(first) = item.split_whitespace().next() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            if c.is_uppercase() && chars.all(|c| c.is_lowercase()) && first != "User" {
                return Some(first.to_string());
            }
        }
    }
    mentions
        .iter()
        .find(|m| item.contains(&m.name))
        .map(|m| m.name.clone())
}
