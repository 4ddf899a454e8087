// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal fallbacks used when every provider in the chain has failed.
//!
//! Text mode answers with an empathetic, topic-aware canned reply chosen by
//! keyword ladder. JSON mode synthesizes an extraction-shaped object from the
//! same surface patterns the extraction prompt asks the model about, so
//! downstream consumers always receive a well-formed result.

use serde_json::{json, Value};

const EMOTION_WORDS: &[&str] = &[
    "sad",
    "angry",
    "frustrated",
    "upset",
    "happy",
    "excited",
    "worried",
    "anxious",
    "low",
    "down",
];

/// Picks a contextual canned reply based on the prompt content.
///
/// The ladder is ordered most-specific first; the final arm is a generic
/// supportive reply that matches any prompt.
pub fn contextual_reply(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    let reply = if lower.contains("apologize") && lower.contains("friend") {
        "It sounds like you're dealing with a difficult situation with your friend. \
         What happened that's making you consider apologizing?"
    } else if lower.contains("fight") || lower.contains("argument") {
        "Arguments can be really tough. How are you feeling about what happened? \
         Sometimes talking through it helps."
    } else if lower.contains("friend") && (lower.contains("best") || lower.contains("close")) {
        "Best friend situations can be especially hard when there's conflict. \
         What's been going on between you two?"
    } else if ["sad", "angry", "frustrated", "upset", "low", "down"]
        .iter()
        .any(|w| lower.contains(w))
    {
        "I can hear that you're going through a tough time. \
         What's been weighing on your mind?"
    } else if lower.contains("relationship") {
        "Relationships can be complicated. What's happening that's concerning you?"
    } else if lower.contains("work") || lower.contains("job") {
        "Work situations can be stressful. What's going on at work that you'd like to talk about?"
    } else {
        "I'm here to listen and support you. Can you tell me more about what's happening?"
    };

    reply.to_string()
}

/// Builds an extraction-shaped JSON object from the prompt alone.
///
/// The user message is recovered from the `Message: "..."` segment the
/// extraction prompt embeds; if absent, the last 200 characters of the prompt
/// stand in. Pattern matching is deliberately conservative: it only claims
/// meaningful content for clear relationship, emotion, or conflict signals.
pub fn extraction_stub(prompt: &str) -> Value {
    let message = extract_message(prompt);
    let lower = message.to_lowercase();

    let mut people: Vec<String> = Vec::new();
    let mut emotions: Vec<String> = Vec::new();
    let mut situations: Vec<String> = Vec::new();
    let mut meaningful = false;

    if !message.is_empty() {
        if ["friend", "buddy", "colleague", "family"]
            .iter()
            .any(|w| lower.contains(w))
        {
            meaningful = true;
            if lower.contains("best friend") {
                people.push("User mentioned their best friend".to_string());
            } else if lower.contains("friend") {
                people.push("User mentioned a friend".to_string());
            }
        }

        if let Some(emotion) = EMOTION_WORDS.iter().find(|w| lower.contains(*w)) {
            meaningful = true;
            emotions.push(format!("User is feeling {emotion}"));
        }

        if ["fight", "argument", "conflict", "problem", "issue"]
            .iter()
            .any(|w| lower.contains(w))
        {
            meaningful = true;
            situations.push("User is dealing with a conflict situation".to_string());
        }
    }

    let information_type = if !people.is_empty() {
        "relationship"
    } else if !emotions.is_empty() {
        "emotion"
    } else if !situations.is_empty() {
        "situation"
    } else {
        "other"
    };

    let summary: String = message.chars().take(100).collect();

    json!({
        "has_meaningful_content": meaningful,
        "information_type": information_type,
        "extracted_info": {
            "people": people,
            "facts": [],
            "preferences": [],
            "emotions": emotions,
            "situations": situations,
        },
        "key_entities": [],
        "summary": summary,
        "priority": if meaningful { "medium" } else { "low" },
    })
}

fn extract_message(prompt: &str) -> String {
    if let Some(after) = prompt.split("Message: \"").nth(1) {
        if let Some(message) = after.split('"').next() {
            return message.to_string();
        }
    }
    let chars: Vec<char> = prompt.chars().collect();
    if chars.len() > 200 {
        chars[chars.len() - 200..].iter().collect()
    } else {
        prompt.to_string()
    }
}
