// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response post-processing: tone cleanup, opener anti-repetition, length cap.
//!
//! Pure string-to-string transformation with no I/O, applied to every
//! generated reply before it reaches the user.

use std::sync::LazyLock;

use regex::Regex;

use solace_core::types::{ChatTurn, Role};

/// Stock phrases substituted for calmer alternatives.
static SUBSTITUTIONS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)grab coffee").unwrap(), "talk about it"),
        (Regex::new(r"(?i)brainstorm").unwrap(), "think through it"),
    ]
});

/// Stock phrases removed outright.
static REMOVALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"that's absolutely",
        r"i totally understand",
        r"that sounds incredibly",
        r"wow, that's really",
        r"oh my goodness",
        r"that's so tough",
        r"i can only imagine",
        r"that must be so hard",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", regex::escape(p))).unwrap())
    .collect()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const STARTER_WORDS: &[&str] = &["hey", "oh", "yeah", "hmm", "right", "so"];

fn starter_alternative(starter: &str) -> Option<&'static str> {
    match starter {
        "hey" => Some("Right,"),
        "oh" => Some("Hmm,"),
        "yeah" => Some("I see,"),
        "so" => Some("Well,"),
        _ => None,
    }
}

/// Cleans one generated response.
///
/// `history` is the turn history of the conversation the response belongs
/// to; only its recent assistant turns influence the opener heuristic.
pub fn clean(response: &str, history: &[ChatTurn]) -> String {
    let mut response = response.to_string();

    for (pattern, replacement) in SUBSTITUTIONS.iter() {
        response = pattern.replace_all(&response, *replacement).into_owned();
    }
    for pattern in REMOVALS.iter() {
        response = pattern.replace_all(&response, "").into_owned();
    }

    response = dampen_repeated_opener(response, history);

    // Cap at two sentences when the raw response runs past three.
    let sentences: Vec<&str> = response.split('.').collect();
    if sentences.len() > 3 {
        response = format!(
            "{}. {}.",
            sentences[0].trim(),
            sentences[1].trim()
        );
    }

    WHITESPACE.replace_all(&response, " ").trim().to_string()
}

/// Swaps or drops the opening word when it has opened two or more of the
/// last three assistant turns. A heuristic, not a guarantee.
fn dampen_repeated_opener(response: String, history: &[ChatTurn]) -> String {
    if history.len() <= 2 {
        return response;
    }

    let Some(first_word) = response.split_whitespace().next() else {
        return response;
    };
    let starter = first_word.to_lowercase();
    if !STARTER_WORDS.contains(&starter.as_str()) {
        return response;
    }

    let recent = &history[history.len().saturating_sub(3)..];
    let repeats = recent
        .iter()
        .filter(|turn| turn.role == Role::Assistant)
        .filter_map(|turn| turn.content.split_whitespace().next())
        .filter(|word| word.to_lowercase() == starter)
        .count();
    if repeats < 2 {
        return response;
    }

    match starter_alternative(&starter) {
        Some(alternative) => response.replacen(first_word, alternative, 1),
        None => response
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grab_coffee_becomes_talk_about_it() {
        let cleaned = clean("Let's grab coffee and talk", &[]);
        assert_eq!(cleaned, "Let's talk about it and talk");
    }

    #[test]
    fn brainstorm_becomes_think_through_it() {
        let cleaned = clean("We could brainstorm ideas together", &[]);
        assert_eq!(cleaned, "We could think through it ideas together");
    }

    #[test]
    fn dramatic_phrases_are_removed_and_whitespace_collapsed() {
        let cleaned = clean("Oh my goodness that must be so hard for you", &[]);
        assert_eq!(cleaned, "for you");
    }

    #[test]
    fn removal_is_case_insensitive() {
        let cleaned = clean("I Totally Understand what you mean", &[]);
        assert_eq!(cleaned, "what you mean");
    }

    #[test]
    fn repeated_opener_is_swapped() {
        let history = vec![
            ChatTurn::user("one"),
            ChatTurn::assistant("Hey there"),
            ChatTurn::user("two"),
            ChatTurn::assistant("Hey again"),
        ];
        let cleaned = clean("Hey what's going on", &history);
        assert_eq!(cleaned, "Right, what's going on");
    }

    #[test]
    fn opener_without_alternative_is_dropped() {
        let history = vec![
            ChatTurn::user("one"),
            ChatTurn::assistant("Hmm maybe"),
            ChatTurn::user("two"),
            ChatTurn::assistant("Hmm possibly"),
        ];
        let cleaned = clean("Hmm that could work", &history);
        assert_eq!(cleaned, "that could work");
    }

    #[test]
    fn single_use_opener_is_left_alone() {
        let history = vec![
            ChatTurn::user("one"),
            ChatTurn::assistant("Hey there"),
            ChatTurn::user("two"),
            ChatTurn::assistant("Sure thing"),
        ];
        let cleaned = clean("Hey what's new", &history);
        assert_eq!(cleaned, "Hey what's new");
    }

    #[test]
    fn short_history_skips_opener_heuristic() {
        let history = vec![ChatTurn::user("one"), ChatTurn::assistant("Hey")];
        let cleaned = clean("Hey again", &history);
        assert_eq!(cleaned, "Hey again");
    }

    #[test]
    fn long_responses_truncate_to_two_sentences() {
        let cleaned = clean("First point. Second point. Third point. Fourth point.", &[]);
        assert_eq!(cleaned, "First point. Second point.");
    }

    #[test]
    fn three_sentences_survive() {
        let cleaned = clean("One. Two. Three", &[]);
        assert_eq!(cleaned, "One. Two. Three");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean("", &[]), "");
        assert_eq!(clean("   ", &[]), "");
    }
}
