// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Solace memory engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use solace_core::SolaceError;

/// Top-level Solace configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolaceConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory store and retrieval settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Generation orchestrator settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Prompt assembly settings.
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Gemini API settings (primary generation provider).
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// OpenAI API settings (secondary generation provider and embeddings).
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl SolaceConfig {
    /// Validates cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), SolaceError> {
        if self.memory.interaction_cap == 0 {
            return Err(SolaceError::Config(
                "memory.interaction_cap must be at least 1".into(),
            ));
        }
        if self.memory.embedding_dimensions == 0 {
            return Err(SolaceError::Config(
                "memory.embedding_dimensions must be greater than 0".into(),
            ));
        }
        if self.generation.max_attempts == 0 {
            return Err(SolaceError::Config(
                "generation.max_attempts must be at least 1".into(),
            ));
        }
        if self.generation.base_backoff_ms == 0 {
            return Err(SolaceError::Config(
                "generation.base_backoff_ms must be greater than 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(SolaceError::Config(format!(
                "generation.temperature must be within 0.0-2.0, got {}",
                self.generation.temperature
            )));
        }
        if self.prompt.history_window == 0 {
            return Err(SolaceError::Config(
                "prompt.history_window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("solace").join("solace.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("solace.db"))
        .to_string_lossy()
        .into_owned()
}

/// Memory store and retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Embedding dimensionality, constant across all records for a deployment.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Maximum interaction-type records retained per user. Older interaction
    /// records beyond the cap are deleted after each interaction write.
    #[serde(default = "default_interaction_cap")]
    pub interaction_cap: usize,

    /// Default number of memories returned by a search.
    #[serde(default = "default_search_limit")]
    pub default_search_limit: usize,

    /// Maximum stored length of the source_message metadata field.
    #[serde(default = "default_source_message_max_len")]
    pub source_message_max_len: usize,

    /// Maximum length of an extraction summary.
    #[serde(default = "default_summary_max_len")]
    pub summary_max_len: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            embedding_dimensions: default_embedding_dimensions(),
            interaction_cap: default_interaction_cap(),
            default_search_limit: default_search_limit(),
            source_message_max_len: default_source_message_max_len(),
            summary_max_len: default_summary_max_len(),
        }
    }
}

fn default_embedding_dimensions() -> usize {
    384
}

fn default_interaction_cap() -> usize {
    20
}

fn default_search_limit() -> usize {
    8
}

fn default_source_message_max_len() -> usize {
    200
}

fn default_summary_max_len() -> usize {
    100
}

/// Generation orchestrator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Primary-provider attempt ceiling before failing over.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds, doubled per attempt.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Per-request timeout in seconds for provider calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Max tokens for free-text generation.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Max tokens for JSON-mode generation.
    #[serde(default = "default_json_max_tokens")]
    pub json_max_tokens: u32,

    /// Sampling temperature for free-text generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Sampling temperature for JSON-mode generation (lower for stability).
    #[serde(default = "default_json_temperature")]
    pub json_temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            max_tokens: default_max_tokens(),
            json_max_tokens: default_json_max_tokens(),
            temperature: default_temperature(),
            json_temperature: default_json_temperature(),
        }
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    500
}

fn default_json_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_json_temperature() -> f32 {
    0.3
}

/// Prompt assembly configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Display name of the companion persona.
    #[serde(default = "default_persona_name")]
    pub persona_name: String,

    /// Number of recent turns included verbatim in the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Per-category memory caps in the assembled prompt.
    #[serde(default = "default_max_people")]
    pub max_people: usize,

    #[serde(default = "default_max_facts")]
    pub max_facts: usize,

    #[serde(default = "default_max_preferences")]
    pub max_preferences: usize,

    #[serde(default = "default_max_situations")]
    pub max_situations: usize,

    #[serde(default = "default_max_emotions")]
    pub max_emotions: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona_name: default_persona_name(),
            history_window: default_history_window(),
            max_people: default_max_people(),
            max_facts: default_max_facts(),
            max_preferences: default_max_preferences(),
            max_situations: default_max_situations(),
            max_emotions: default_max_emotions(),
        }
    }
}

fn default_persona_name() -> String {
    "Solace".to_string()
}

fn default_history_window() -> usize {
    4
}

fn default_max_people() -> usize {
    3
}

fn default_max_facts() -> usize {
    3
}

fn default_max_preferences() -> usize {
    2
}

fn default_max_situations() -> usize {
    2
}

fn default_max_emotions() -> usize {
    2
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for generation requests.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Nucleus sampling cutoff.
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Top-k sampling cutoff.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            top_p: default_top_p(),
            top_k: default_top_k(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_top_p() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

/// OpenAI API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for chat completion requests.
    #[serde(default = "default_openai_chat_model")]
    pub chat_model: String,

    /// Model identifier for embedding requests.
    #[serde(default = "default_openai_embedding_model")]
    pub embedding_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            chat_model: default_openai_chat_model(),
            embedding_model: default_openai_embedding_model(),
        }
    }
}

fn default_openai_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
