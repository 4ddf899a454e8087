// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the memory and generation core.
//!
//! Each test wires an Engine over in-memory SQLite with scripted providers
//! and a deterministic embedder. Tests are independent and order-insensitive.

use std::sync::Arc;

use tokio_rusqlite::Connection;

use solace_config::model::SolaceConfig;
use solace_core::traits::GenerationProvider;
use solace_core::types::ChatTurn;
use solace_engine::Engine;
use solace_memory::MemoryKind;
use solace_prompt::UserProfile;
use solace_test_utils::{HashEmbedder, ScriptedOutcome, ScriptedProvider};

struct Harness {
    engine: Engine,
    primary: Arc<ScriptedProvider>,
    secondary: Arc<ScriptedProvider>,
    embedder: Arc<HashEmbedder>,
}

async fn harness(primary_outcomes: Vec<ScriptedOutcome>, secondary_outcomes: Vec<ScriptedOutcome>) -> Harness {
    let mut config = SolaceConfig::default();
    config.memory.embedding_dimensions = 32;
    config.generation.base_backoff_ms = 1;

    let primary = Arc::new(ScriptedProvider::with_outcomes("primary", primary_outcomes));
    let secondary = Arc::new(ScriptedProvider::with_outcomes("secondary", secondary_outcomes));
    let embedder = Arc::new(HashEmbedder::new(32));

    let conn = Connection::open_in_memory().await.unwrap();
    let engine = Engine::new(
        conn,
        config,
        primary.clone() as Arc<dyn GenerationProvider>,
        Some(secondary.clone() as Arc<dyn GenerationProvider>),
        embedder.clone(),
    )
    .await
    .unwrap();

    Harness {
        engine,
        primary,
        secondary,
        embedder,
    }
}

fn ai_extraction_json() -> ScriptedOutcome {
    ScriptedOutcome::Text(
        r#"{
            "has_meaningful_content": true,
            "information_type": "relationship",
            "extracted_info": {
                "people": ["Sam is user's friend"],
                "situations": ["User had a fight with Sam"]
            },
            "key_entities": ["Sam"],
            "summary": "Fight with friend Sam",
            "priority": "high"
        }"#
        .to_string(),
    )
}

// ---- Extraction and memory write-back ----

#[tokio::test]
async fn extract_and_remember_then_search_round_trip() {
    let h = harness(vec![ai_extraction_json()], vec![]).await;

    let message = "I had a fight with my friend Sam";
    let result = h.engine.extract(message).await;
    assert!(result.has_meaningful_content);
    assert!(result.summary.chars().count() <= 100);

    let written = h.engine.remember("user-1", message, &result, Some("conv-1")).await;
    assert!(written.len() >= 2);

    let results = h.engine.search("user-1", "my friend Sam").await.unwrap();
    assert!(!results.is_empty());
    assert!(results
        .iter()
        .any(|m| m.record.content == "Sam is user's friend"));
}

#[tokio::test]
async fn extraction_survives_total_provider_outage() {
    let h = harness(
        vec![ScriptedOutcome::Fatal],
        vec![ScriptedOutcome::Fatal],
    )
    .await;

    let result = h.engine.extract("I feel sad about my friend Sam").await;
    assert!(result.has_meaningful_content, "pattern floor still fires");
    assert!(result.summary.chars().count() <= 100);
    let written = h
        .engine
        .remember("user-1", "I feel sad about my friend Sam", &result, None)
        .await;
    assert!(!written.is_empty());
}

#[tokio::test]
async fn search_on_empty_user_never_embeds() {
    let h = harness(vec![], vec![]).await;

    let results = h.engine.search("nobody", "anything at all").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(h.embedder.calls(), 0);
}

// ---- Interaction retention ----

#[tokio::test]
async fn interaction_cap_holds_across_repeated_writes() {
    let h = harness(vec![], vec![]).await;

    for i in 0..25 {
        h.engine
            .write_interaction("user-1", &format!("message {i}"), "a reply", None)
            .await
            .unwrap();
    }

    let mut filter = serde_json::Map::new();
    filter.insert("type".to_string(), serde_json::json!("interaction"));
    let interactions = h
        .engine
        .search_with("user-1", "", 100, Some(&filter))
        .await
        .unwrap();
    assert_eq!(interactions.len(), 20);
    // Newest survive.
    assert!(interactions
        .iter()
        .any(|m| m.record.content.contains("message 24")));
    assert!(!interactions
        .iter()
        .any(|m| m.record.content.contains("message 4")));
}

// ---- Generation chain ----

#[tokio::test]
async fn empty_primary_twice_fails_over_to_secondary() {
    let h = harness(
        vec![ScriptedOutcome::Empty, ScriptedOutcome::Empty],
        vec![ScriptedOutcome::Text("secondary says hi".into())],
    )
    .await;

    let text = h.engine.generate_text("hello").await;
    assert_eq!(text, "secondary says hi");
    assert_eq!(h.primary.calls(), 2);
    assert_eq!(h.secondary.calls(), 1);
}

#[tokio::test]
async fn rate_limited_primary_fails_over_immediately() {
    let h = harness(
        vec![ScriptedOutcome::RateLimited],
        vec![ScriptedOutcome::Text("rescued".into())],
    )
    .await;

    let text = h.engine.generate_text("hello").await;
    assert_eq!(text, "rescued");
    assert_eq!(h.primary.calls(), 1, "no second primary attempt after 429");
}

#[tokio::test]
async fn json_mode_always_yields_object_with_meaningful_flag() {
    let h = harness(
        vec![ScriptedOutcome::Transient, ScriptedOutcome::Transient],
        vec![ScriptedOutcome::Fatal],
    )
    .await;

    let value = h
        .engine
        .generate_json("Extract info.\nMessage: \"I am worried about work\"")
        .await;
    assert!(value.is_object());
    assert!(value["has_meaningful_content"].is_boolean());
}

#[tokio::test]
async fn text_fallback_is_contextual() {
    let h = harness(
        vec![ScriptedOutcome::Fatal],
        vec![ScriptedOutcome::Fatal],
    )
    .await;

    let text = h
        .engine
        .generate_text("my best friend and I had an argument")
        .await;
    assert!(text.contains("Arguments can be really tough"), "got: {text}");
}

// ---- Prompt assembly and cleanup ----

#[tokio::test]
async fn freshly_written_memory_does_not_haunt_its_own_reply() {
    let h = harness(vec![ai_extraction_json()], vec![]).await;

    let message = "I had a fight with my friend Sam";
    let result = h.engine.extract(message).await;
    h.engine.remember("user-1", message, &result, None).await;

    let memories = h.engine.search("user-1", message).await.unwrap();
    assert!(!memories.is_empty());

    let prompt = h.engine.build_prompt(
        message,
        "",
        &memories,
        &UserProfile::default(),
        &[],
        true,
    );
    // Every memory written this turn carries this message as source_message,
    // so the memory section must be absent entirely.
    assert!(!prompt.contains("LONG-TERM MEMORIES"));
    assert!(prompt.contains(&format!("User's message: \"{message}\"")));
}

#[tokio::test]
async fn prompt_includes_memories_from_older_turns() {
    let h = harness(vec![ai_extraction_json()], vec![]).await;

    let old_message = "I had a fight with my friend Sam";
    let result = h.engine.extract(old_message).await;
    h.engine.remember("user-1", old_message, &result, None).await;

    let new_message = "should I apologize?";
    let memories = h.engine.search("user-1", new_message).await.unwrap();
    let prompt = h.engine.build_prompt(
        new_message,
        "anxious",
        &memories,
        &UserProfile::default(),
        &[ChatTurn::user(old_message), ChatTurn::assistant("That sounds rough.")],
        true,
    );

    assert!(prompt.contains("LONG-TERM MEMORIES"));
    assert!(prompt.contains("Sam is user's friend"));
    assert!(prompt.contains("Solace (You): That sounds rough."));
    assert!(prompt.contains("mood reads as: anxious"));

    let person = memories
        .iter()
        .find(|m| m.record.metadata.kind == MemoryKind::Person)
        .unwrap();
    assert_eq!(person.record.metadata.person_name.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn clean_applies_phrase_substitution() {
    let h = harness(vec![], vec![]).await;
    let cleaned = h.engine.clean("Let's grab coffee and talk", &[]);
    assert_eq!(cleaned, "Let's talk about it and talk");
}
