// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Facade wiring the Solace memory and generation core.
//!
//! [`Engine`] owns the store, retriever, extractor, orchestrator, and
//! assembler, and exposes the operations the chat-turn handler calls.
//! Providers are injected; the engine never constructs network clients
//! itself.

pub mod engine;

pub use engine::Engine;
