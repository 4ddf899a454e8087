// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Solace memory and generation engine.

use thiserror::Error;

/// Classification of a provider failure, used by the generation
/// orchestrator to decide between retry, failover, and giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Rate-limit or quota exhaustion signal (429, RESOURCE_EXHAUSTED).
    /// Retrying the same provider is pointless; fail over immediately.
    RateLimited,
    /// Timeout, 5xx, or connection failure. Worth retrying with backoff.
    Transient,
    /// Malformed request, auth failure, unparseable response body.
    /// Not retried within the same provider.
    Fatal,
}

/// The primary error type used across all Solace traits and core operations.
#[derive(Debug, Error)]
pub enum SolaceError {
    /// Configuration errors (invalid TOML, missing required fields, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generation or embedding provider errors, classified for the fallback chain.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        kind: ProviderErrorKind,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    /// The fallback-chain classification of this error.
    ///
    /// Timeouts count as transient; everything that is not a provider
    /// error or a timeout is fatal from the orchestrator's point of view.
    pub fn provider_kind(&self) -> ProviderErrorKind {
        match self {
            SolaceError::Provider { kind, .. } => *kind,
            SolaceError::Timeout { .. } => ProviderErrorKind::Transient,
            _ => ProviderErrorKind::Fatal,
        }
    }

    /// True when this error signals rate-limit or quota exhaustion.
    pub fn is_rate_limited(&self) -> bool {
        self.provider_kind() == ProviderErrorKind::RateLimited
    }
}
