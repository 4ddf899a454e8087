// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly: persona rules, grouped memories, recent history, task.
//!
//! Memories are grouped by category and capped per group in a fixed order,
//! so the prompt stays small and predictable no matter how many memories a
//! retrieval returned. The recency-exclusion rule keeps the memory written
//! from the current message out of the reply to that same message.

use solace_core::types::{ChatTurn, Role};
use solace_config::model::PromptConfig;
use solace_memory::types::{MemoryKind, RankedMemory};
use serde::{Deserialize, Serialize};

/// Profile facts about the user supplied by the outer chat layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    /// Preferred display name, if the user has set one.
    #[serde(default)]
    pub name: Option<String>,
}

/// Assembles generation prompts from message, memories, and history.
pub struct PromptAssembler {
    config: PromptConfig,
}

impl PromptAssembler {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    /// Builds the full generation prompt for one chat turn.
    pub fn build(
        &self,
        message: &str,
        sentiment: &str,
        memories: &[RankedMemory],
        profile: &UserProfile,
        history: &[ChatTurn],
        has_memories: bool,
    ) -> String {
        let persona = &self.config.persona_name;
        let mut prompt = format!(
            "You are {persona}, an empathetic and supportive AI companion. Your goal is to be a great listener.\n\
             \n\
             **Your Core Rules:**\n\
             1.  **Be Present:** Respond ONLY to the user's most recent message.\n\
             2.  **Use Your Memory:** You have access to long-term memories. Use them to show you remember details from past conversations. Never assert a past event that is not listed below.\n\
             3.  **Don't State the Obvious:** If the user just told you something, don't say \"I remember you mentioned...\" or \"You just said...\". Instead, use the information to ask a follow-up question.\n\
             4.  **Be Natural and Brief:** Keep your tone calm and your responses short (1-3 sentences).\n"
        );

        if let Some(name) = profile.name.as_deref().filter(|n| !n.trim().is_empty()) {
            prompt.push_str(&format!("\nYou are speaking with {name}.\n"));
        }
        if !sentiment.trim().is_empty() {
            prompt.push_str(&format!(
                "\nThe user's current mood reads as: {}.\n",
                sentiment.trim()
            ));
        }

        let memory_section = if has_memories {
            self.memory_section(message, memories)
        } else {
            String::new()
        };
        prompt.push_str(&memory_section);

        if !history.is_empty() {
            prompt.push_str("\n--- CURRENT CONVERSATION HISTORY ---\n");
            let start = history.len().saturating_sub(self.config.history_window);
            for turn in &history[start..] {
                let label = match turn.role {
                    Role::User => "User".to_string(),
                    Role::Assistant => format!("{persona} (You)"),
                };
                prompt.push_str(&format!("{label}: {}\n", turn.content));
            }
        }

        prompt.push_str(&format!(
            "\n--- TASK ---\n\
             Respond to the user's latest message based on the context above.\n\
             User's message: \"{message}\"\n"
        ));

        prompt
    }

    /// The grouped memory section, or empty when nothing survives the caps
    /// and the recency exclusion.
    fn memory_section(&self, message: &str, memories: &[RankedMemory]) -> String {
        let message_lower = message.to_lowercase();

        // A memory written from this very message must not echo back into
        // the reply to it.
        let fresh: Vec<&RankedMemory> = memories
            .iter()
            .filter(|m| {
                m.record
                    .metadata
                    .source_message
                    .as_deref()
                    .is_none_or(|source| !source.to_lowercase().contains(&message_lower))
            })
            .collect();

        let groups = [
            (MemoryKind::Person, self.config.max_people),
            (MemoryKind::Fact, self.config.max_facts),
            (MemoryKind::Preference, self.config.max_preferences),
            (MemoryKind::Situation, self.config.max_situations),
            (MemoryKind::Emotion, self.config.max_emotions),
        ];

        let mut bullets = String::new();
        for (kind, cap) in groups {
            for m in fresh
                .iter()
                .filter(|m| m.record.metadata.kind == kind)
                .take(cap)
            {
                bullets.push_str(&format!("- {}\n", m.record.content));
            }
        }

        if bullets.is_empty() {
            return String::new();
        }

        format!(
            "\n--- LONG-TERM MEMORIES ---\n\
             Here are things you remember from previous conversations:\n\
             {bullets}"
        )
    }
}
