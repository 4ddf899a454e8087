// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding provider trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::SolaceError;

/// A text-to-vector embedding capability.
///
/// Embedding dimensionality is fixed per deployment; every record in the
/// memory store carries a vector of exactly `dimensions()` floats.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + 'static {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Fixed output dimensionality for this deployment.
    fn dimensions(&self) -> usize;

    /// Embeds one text into a vector of `dimensions()` floats.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, SolaceError>;
}
