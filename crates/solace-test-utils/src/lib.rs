// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for Solace provider seams.
//!
//! - [`ScriptedProvider`]: generation provider replaying a queue of outcomes
//! - [`HashEmbedder`]: deterministic embedding provider with a call counter

pub mod hash_embedder;
pub mod scripted_provider;

pub use hash_embedder::HashEmbedder;
pub use scripted_provider::{ScriptedOutcome, ScriptedProvider};
