// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Solace memory engine.
//!
//! TOML files merged in XDG order with `SOLACE_*` environment overrides,
//! extracted into serde-defaulted config structs.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    GeminiConfig, GenerationConfig, MemoryConfig, OpenAiConfig, PromptConfig, SolaceConfig,
    StorageConfig,
};
