// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini generateContent client for Solace.
//!
//! Implements [`solace_core::traits::GenerationProvider`] as the primary
//! provider in the fallback chain.

pub mod client;
pub mod types;

pub use client::GeminiClient;
