// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly and response post-processing for Solace.

pub mod assembler;
pub mod postprocess;

pub use assembler::{PromptAssembler, UserProfile};
pub use postprocess::clean;
