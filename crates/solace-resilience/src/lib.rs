// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilient generation for Solace.
//!
//! A fixed provider chain (primary with bounded retries, secondary once,
//! static fallback) exposed through [`GenerationOrchestrator`], whose
//! `generate_text` and `generate_json` entry points never fail.

pub mod fallback;
pub mod json;
pub mod orchestrator;

pub use json::{parse_json_object, strip_code_fences};
pub use orchestrator::{AttemptOutcome, GenerationAttempt, GenerationOrchestrator};
