// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory domain types for the per-user semantic memory system.

use serde::{Deserialize, Serialize};

use solace_core::error::SolaceError;

/// Category of a stored memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    /// A person in the user's life, with relationship context.
    Person,
    /// A durable fact about the user.
    Fact,
    /// A like, dislike, or preference.
    Preference,
    /// An emotional state.
    Emotion,
    /// An ongoing situation.
    Situation,
    /// A rolling conversation-turn summary, subject to the retention cap.
    Interaction,
}

impl MemoryKind {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Person => "person",
            MemoryKind::Fact => "fact",
            MemoryKind::Preference => "preference",
            MemoryKind::Emotion => "emotion",
            MemoryKind::Situation => "situation",
            MemoryKind::Interaction => "interaction",
        }
    }

    /// Parse from SQLite string. Unknown values read as facts.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "person" => MemoryKind::Person,
            "preference" => MemoryKind::Preference,
            "emotion" => MemoryKind::Emotion,
            "situation" => MemoryKind::Situation,
            "interaction" => MemoryKind::Interaction,
            _ => MemoryKind::Fact,
        }
    }
}

/// Importance of a memory, assigned at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

// Manual impl: unknown priority strings read as Medium, and the variant
// order must stay Low < Medium < High for the derived Ord.
impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        })
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Dominant classification of an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationType {
    Relationship,
    Fact,
    Preference,
    Situation,
    Emotion,
    #[serde(other)]
    Other,
}

impl Default for InformationType {
    fn default() -> Self {
        InformationType::Other
    }
}

/// Typed metadata attached to every memory record, serialized to a JSON
/// column. Unknown keys survive round-trips through the flattened map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMetadata {
    /// Memory category.
    #[serde(rename = "type")]
    pub kind: MemoryKind,

    /// Importance assigned at extraction time.
    #[serde(default)]
    pub priority: Priority,

    /// Dominant classification of the extraction that produced this record.
    #[serde(default)]
    pub information_type: InformationType,

    /// Main topics named in the source message.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_entities: Vec<String>,

    /// The user message this memory was extracted from, truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_message: Option<String>,

    /// Detected person name, set for person records whose content leads with
    /// a title-case word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,

    /// Conversation the memory was created in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    /// Open extension map for keys not modeled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MemoryMetadata {
    pub fn new(kind: MemoryKind, priority: Priority) -> Self {
        Self {
            kind,
            priority,
            information_type: InformationType::Other,
            key_entities: Vec::new(),
            source_message: None,
            person_name: None,
            conversation_id: None,
            extra: serde_json::Map::new(),
        }
    }

    /// True when every key/value pair in `filter` matches this metadata,
    /// compared through the JSON representation.
    pub fn matches(&self, filter: &serde_json::Map<String, serde_json::Value>) -> bool {
        if filter.is_empty() {
            return true;
        }
        let own = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => return false,
        };
        filter.iter().all(|(k, v)| own.get(k) == Some(v))
    }
}

impl Default for MemoryMetadata {
    fn default() -> Self {
        Self::new(MemoryKind::Fact, Priority::Low)
    }
}

/// Embedding as stored: either a decoded vector (BLOB column) or a legacy
/// JSON-encoded string that decodes lazily.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredEmbedding {
    Vector(Vec<f32>),
    Encoded(String),
}

impl StoredEmbedding {
    /// Decode into a vector. Legacy rows with corrupt text fail here; the
    /// retriever scores those at a fixed low value instead of dropping them.
    pub fn decode(&self) -> Result<Vec<f32>, SolaceError> {
        match self {
            StoredEmbedding::Vector(v) => Ok(v.clone()),
            StoredEmbedding::Encoded(s) => serde_json::from_str(s).map_err(|e| {
                SolaceError::Internal(format!("undecodable stored embedding: {e}"))
            }),
        }
    }
}

/// One stored memory row.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub id: String,
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub content: String,
    pub embedding: StoredEmbedding,
    pub metadata: MemoryMetadata,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    /// ISO 8601 last-update timestamp.
    pub updated_at: String,
}

/// A memory with its retrieval score.
///
/// Recency-path listings score 0.0; records whose embedding could not be
/// decoded score 0.1.
#[derive(Debug, Clone)]
pub struct RankedMemory {
    pub record: MemoryRecord,
    pub score: f32,
}

/// Per-category extracted items, in the fixed category order used by prompt
/// assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryBag {
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub situations: Vec<String>,
}

impl CategoryBag {
    /// Categories in fixed order, paired with the singular memory kind used
    /// when persisting items from that category.
    pub fn iter(&self) -> impl Iterator<Item = (MemoryKind, &Vec<String>)> {
        [
            (MemoryKind::Person, &self.people),
            (MemoryKind::Fact, &self.facts),
            (MemoryKind::Preference, &self.preferences),
            (MemoryKind::Emotion, &self.emotions),
            (MemoryKind::Situation, &self.situations),
        ]
        .into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }

    /// Merge another bag into this one, per-category, deduplicating while
    /// preserving first-seen order.
    pub fn merge(&mut self, other: &CategoryBag) {
        fn union(into: &mut Vec<String>, from: &[String]) {
            for item in from {
                if !into.iter().any(|existing| existing == item) {
                    into.push(item.clone());
                }
            }
        }
        union(&mut self.people, &other.people);
        union(&mut self.facts, &other.facts);
        union(&mut self.preferences, &other.preferences);
        union(&mut self.emotions, &other.emotions);
        union(&mut self.situations, &other.situations);
    }
}

/// Result of a fact-extraction pass over one user message.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub has_meaningful_content: bool,
    pub information_type: InformationType,
    pub extracted: CategoryBag,
    pub key_entities: Vec<String>,
    /// Brief summary of the message, at most 100 characters.
    pub summary: String,
    pub priority: Priority,
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap_or([0; 4])))
        .collect()
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for length mismatch or a zero-norm operand rather than
/// propagating an error; a useless score is better than a failed retrieval.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Truncate to at most `max` characters, on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrips_through_strings() {
        for kind in [
            MemoryKind::Person,
            MemoryKind::Fact,
            MemoryKind::Preference,
            MemoryKind::Emotion,
            MemoryKind::Situation,
            MemoryKind::Interaction,
        ] {
            assert_eq!(MemoryKind::from_str_value(kind.as_str()), kind);
        }
        assert_eq!(MemoryKind::from_str_value("garbage"), MemoryKind::Fact);
    }

    #[test]
    fn unknown_priority_reads_as_medium() {
        let p: Priority = serde_json::from_str("\"urgent\"").unwrap();
        assert_eq!(p, Priority::Medium);
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
        let p: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(p, Priority::Low);
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn priority_ordering_is_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn metadata_roundtrips_with_extra_keys() {
        let json = r#"{
            "type": "interaction",
            "priority": "low",
            "user_message_length": 42,
            "ai_response_length": 17
        }"#;
        let meta: MemoryMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.kind, MemoryKind::Interaction);
        assert_eq!(meta.priority, Priority::Low);
        assert_eq!(meta.extra["user_message_length"], 42);

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["type"], "interaction");
        assert_eq!(back["ai_response_length"], 17);
    }

    #[test]
    fn metadata_filter_matches_well_known_and_extra_keys() {
        let mut meta = MemoryMetadata::new(MemoryKind::Person, Priority::High);
        meta.extra
            .insert("tag".to_string(), serde_json::Value::String("x".into()));

        let mut filter = serde_json::Map::new();
        filter.insert("type".to_string(), serde_json::json!("person"));
        assert!(meta.matches(&filter));

        filter.insert("tag".to_string(), serde_json::json!("x"));
        assert!(meta.matches(&filter));

        filter.insert("tag".to_string(), serde_json::json!("y"));
        assert!(!meta.matches(&filter));
    }

    #[test]
    fn stored_embedding_decodes_both_forms() {
        let v = StoredEmbedding::Vector(vec![0.25, -0.5]);
        assert_eq!(v.decode().unwrap(), vec![0.25, -0.5]);

        let e = StoredEmbedding::Encoded("[0.25, -0.5]".to_string());
        assert_eq!(e.decode().unwrap(), vec![0.25, -0.5]);

        let bad = StoredEmbedding::Encoded("not a vector".to_string());
        assert!(bad.decode().is_err());
    }

    #[test]
    fn blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, -0.5, 1.0];
        let recovered = blob_to_vec(&vec_to_blob(&original));
        assert_eq!(original.len(), recovered.len());
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);

        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < f32::EPSILON);

        let sim = cosine_similarity(&[2.0, 0.0], &[1.0, 0.0]);
        assert!((sim - 1.0).abs() < f32::EPSILON, "scaling must not matter");
    }

    #[test]
    fn category_bag_merge_deduplicates() {
        let mut a = CategoryBag {
            people: vec!["Sam is user's friend".into()],
            emotions: vec!["User is feeling sad".into()],
            ..CategoryBag::default()
        };
        let b = CategoryBag {
            people: vec![
                "Sam is user's friend".into(),
                "User mentioned a colleague".into(),
            ],
            ..CategoryBag::default()
        };
        a.merge(&b);
        assert_eq!(a.people.len(), 2);
        assert_eq!(a.people[0], "Sam is user's friend");
        assert_eq!(a.emotions.len(), 1);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
