// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core trait definitions, error types, and common types for Solace.
//!
//! This crate defines the seams between the memory/generation engine and
//! its external collaborators: the [`traits::GenerationProvider`] and
//! [`traits::EmbeddingProvider`] capabilities, the [`SolaceError`] taxonomy
//! with its retry classification, and the chat-turn types shared by the
//! prompt assembler and post-processor.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ProviderErrorKind, SolaceError};
pub use traits::{EmbeddingProvider, GenerationProvider};
