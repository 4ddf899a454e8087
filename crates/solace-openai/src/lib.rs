// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI clients for Solace: chat completions (secondary generation
//! provider) and embeddings.

pub mod chat;
pub mod embeddings;
pub mod types;

pub use chat::OpenAiChatClient;
pub use embeddings::OpenAiEmbeddingClient;
