// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regex-based extraction floor.
//!
//! These patterns run on every message regardless of provider health; the
//! AI extraction pass can only add to what they find. Topic and emotion
//! patterns match the lowercased message; name-bearing patterns match the
//! original text and require a title-case name, so a following lowercase
//! word ("my buddy from school") is never mistaken for one.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CategoryBag, ExtractionResult, InformationType, Priority};

static MEANINGFUL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(friend|best friend|buddy|colleague|coworker|boss|manager|brother|sister|mom|dad|mother|father)\b",
        r"\b(love|hate|like|dislike|prefer|enjoy|feel|emotion)\b",
        r"\b(work|job|school|university|college)\b",
        r"\b(today|yesterday|tomorrow|next week|last week)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// (pattern, relationship label); group 1 is always the name. The
/// relationship words are case-insensitive, the name group is not: only a
/// title-case word counts as a name.
static RELATIONSHIP_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i:my\s+(?:best friend|friend|buddy)\s+)([A-Z][a-z]+)", "friend"),
        (r"([A-Z][a-z]+)(?i:\s+is\s+my\s+(?:friend|buddy))", "friend"),
        (r"(?i:my\s+(?:colleague|coworker|boss)\s+)([A-Z][a-z]+)", "colleague"),
        (r"(?i:my\s+(?:brother|sister|mom|dad)\s+)([A-Z][a-z]+)", "family"),
    ]
    .iter()
    .map(|(p, label)| (Regex::new(p).unwrap(), *label))
    .collect()
});

static EMOTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"feel\s+(sad|happy|angry|frustrated|excited|anxious|worried|stressed)",
        r"(sad|happy|angry|frustrated|excited|anxious|worried|stressed)\s+about",
        r"i\s+am\s+(sad|happy|angry|frustrated|excited|anxious|worried|stressed)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Patterns pairing a title-case name with an explicit relationship word,
/// both orders: (pattern, name group index, relationship group index).
static PERSON_PATTERNS: LazyLock<Vec<(Regex, usize, usize)>> = LazyLock::new(|| {
    [
        (
            r"(?i:my\s+)((?i:best friend|friend|buddy|pal|mate))(?i:\s+is\s+)([A-Z][a-z]+)",
            2,
            1,
        ),
        (
            r"([A-Z][a-z]+)(?i:\s+is\s+my\s+)((?i:best friend|friend|buddy|pal|mate))",
            1,
            2,
        ),
        (
            r"(?i:my\s+)((?i:brother|sister|mom|dad|mother|father|parent))(?i:\s+)([A-Z][a-z]+)",
            2,
            1,
        ),
        (
            r"([A-Z][a-z]+)(?i:\s+is\s+my\s+)((?i:brother|sister|mom|dad|mother|father|parent))",
            1,
            2,
        ),
        (
            r"(?i:my\s+)((?i:colleague|coworker|boss|manager))(?i:\s+)([A-Z][a-z]+)",
            2,
            1,
        ),
        (
            r"([A-Z][a-z]+)(?i:\s+is\s+my\s+)((?i:colleague|coworker|boss|manager))",
            1,
            2,
        ),
    ]
    .iter()
    .map(|(p, name, rel)| (Regex::new(p).unwrap(), *name, *rel))
    .collect()
});

/// A person named alongside an explicit relationship word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonMention {
    /// Capitalized name as written.
    pub name: String,
    /// The relationship word that anchored the match ("friend", "boss", ...).
    pub relationship: String,
}

/// Runs the regex floor over one message.
pub fn pattern_extract(message: &str) -> ExtractionResult {
    let lower = message.to_lowercase();
    let mut bag = CategoryBag::default();
    let mut meaningful = MEANINGFUL_PATTERNS.iter().any(|p| p.is_match(&lower));

    for (pattern, label) in RELATIONSHIP_PATTERNS.iter() {
        for caps in pattern.captures_iter(message) {
            if let Some(name) = caps.get(1) {
                let entry = format!("{} is user's {label}", name.as_str());
                if !bag.people.contains(&entry) {
                    bag.people.push(entry);
                }
                meaningful = true;
            }
        }
    }

    for pattern in EMOTION_PATTERNS.iter() {
        for caps in pattern.captures_iter(&lower) {
            if let Some(emotion) = caps.get(1) {
                let entry = format!("User is feeling {}", emotion.as_str());
                if !bag.emotions.contains(&entry) {
                    bag.emotions.push(entry);
                }
                meaningful = true;
            }
        }
    }

    let information_type = if !bag.people.is_empty() {
        InformationType::Relationship
    } else if !bag.emotions.is_empty() {
        InformationType::Emotion
    } else {
        InformationType::Other
    };

    ExtractionResult {
        has_meaningful_content: meaningful,
        information_type,
        extracted: bag,
        key_entities: Vec::new(),
        summary: crate::types::truncate_chars(message, 100),
        priority: if meaningful {
            Priority::Medium
        } else {
            Priority::Low
        },
    }
}

/// Finds people named alongside explicit relationship words.
pub fn extract_people(text: &str) -> Vec<PersonMention> {
    let mut people = Vec::new();

    for (pattern, name_group, rel_group) in PERSON_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(name), Some(rel)) = (caps.get(*name_group), caps.get(*rel_group)) else {
                continue;
            };
            let mention = PersonMention {
                name: name.as_str().to_string(),
                relationship: rel.as_str().to_lowercase(),
            };
            if !people.contains(&mention) {
                people.push(mention);
            }
        }
    }

    people
}
