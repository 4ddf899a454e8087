// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user semantic memory for Solace.
//!
//! Facts extracted from conversation are embedded and stored in SQLite, then
//! retrieved by cosine similarity to ground later replies. Extraction runs a
//! regex floor and an AI pass whose results merge by union, so memory keeps
//! working through provider outages.

pub mod extractor;
pub mod patterns;
pub mod retriever;
pub mod store;
pub mod types;

pub use extractor::FactExtractor;
pub use patterns::{extract_people, pattern_extract, PersonMention};
pub use retriever::{MemoryRetriever, RECENCY_SCORE, UNDECODABLE_SCORE};
pub use store::{interaction_summary, MemoryStore};
pub use types::{
    cosine_similarity, truncate_chars, CategoryBag, ExtractionResult, InformationType, MemoryKind,
    MemoryMetadata, MemoryRecord, Priority, RankedMemory, StoredEmbedding,
};
