// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented by external providers.
//!
//! Providers are constructed once at process start and injected into the
//! engine components, so every seam can be replaced with a test double.

pub mod embedding;
pub mod provider;

pub use embedding::EmbeddingProvider;
pub use provider::GenerationProvider;
