// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity retrieval over the per-user memory store.
//!
//! Brute-force cosine scan over a user's rows. Per-user corpora stay small
//! (the interaction cap bounds the noisiest category), so an index would buy
//! nothing here.

use std::sync::Arc;

use tracing::{debug, warn};

use solace_core::error::SolaceError;
use solace_core::traits::EmbeddingProvider;

use crate::store::MemoryStore;
use crate::types::{cosine_similarity, RankedMemory};

/// Score assigned to recency-path listings, where no similarity was computed.
pub const RECENCY_SCORE: f32 = 0.0;

/// Score assigned to records whose stored embedding could not be decoded.
/// Keeps the record in play at low relevance instead of dropping it.
pub const UNDECODABLE_SCORE: f32 = 0.1;

/// Retrieves the memories most relevant to a query.
pub struct MemoryRetriever {
    store: Arc<MemoryStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl MemoryRetriever {
    pub fn new(store: Arc<MemoryStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Searches a user's memories.
    ///
    /// A user with no memories short-circuits before any embedding call. A
    /// blank query lists the most recently updated memories instead of
    /// scoring. `filter` restricts candidates by metadata equality before
    /// similarity is computed.
    pub async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: usize,
        filter: Option<&serde_json::Map<String, serde_json::Value>>,
    ) -> Result<Vec<RankedMemory>, SolaceError> {
        if self.store.count_for_user(user_id).await? == 0 {
            return Ok(Vec::new());
        }

        if query.trim().is_empty() {
            // Filter before the limit so a filtered listing still fills up.
            let records = self.store.load_for_user(user_id).await?;
            let mut listed: Vec<RankedMemory> = records
                .into_iter()
                .filter(|r| filter.is_none_or(|f| r.metadata.matches(f)))
                .map(|record| RankedMemory {
                    record,
                    score: RECENCY_SCORE,
                })
                .collect();
            listed.truncate(limit);
            return Ok(listed);
        }

        let query_embedding = self.embedder.embed(query).await?;
        let records = self.store.load_for_user(user_id).await?;

        let mut ranked: Vec<RankedMemory> = records
            .into_iter()
            .filter(|r| filter.is_none_or(|f| r.metadata.matches(f)))
            .map(|record| {
                let score = match record.embedding.decode() {
                    Ok(vector) => cosine_similarity(&query_embedding, &vector),
                    Err(err) => {
                        warn!(memory_id = %record.id, %err, "scoring undecodable embedding at floor");
                        UNDECODABLE_SCORE
                    }
                };
                RankedMemory { record, score }
            })
            .collect();

        // Descending score; recency breaks ties.
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.record.updated_at.cmp(&a.record.updated_at))
        });
        ranked.truncate(limit);

        debug!(user_id, query_len = query.len(), results = ranked.len(), "memory search");
        Ok(ranked)
    }
}
