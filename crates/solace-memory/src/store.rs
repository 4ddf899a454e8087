// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed per-user memory store with vector BLOB storage.
//!
//! Embeddings are written as f32 little-endian BLOBs. Rows migrated from
//! older deployments may carry the embedding as a JSON text column instead;
//! reads surface both forms through [`StoredEmbedding`] and never fail on
//! the difference.

use chrono::Utc;
use rusqlite::types::ValueRef;
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use solace_config::model::MemoryConfig;
use solace_core::error::SolaceError;

use crate::types::{
    truncate_chars, vec_to_blob, blob_to_vec, MemoryKind, MemoryMetadata, MemoryRecord, Priority,
    StoredEmbedding,
};

/// Helper to convert tokio_rusqlite errors into SolaceError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> SolaceError {
    SolaceError::Storage {
        source: Box::new(e),
    }
}

fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

const SELECT_COLUMNS: &str =
    "id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at";

/// The rolling summary stored for one exchange. Callers embed this exact
/// string before handing it to [`MemoryStore::write_interaction`].
pub fn interaction_summary(user_message: &str, assistant_reply: &str) -> String {
    format!(
        "User said: {} | Assistant replied about: {}",
        truncate_chars(user_message, 100),
        truncate_chars(assistant_reply, 50),
    )
}

/// Persistent store for per-user memories in SQLite.
pub struct MemoryStore {
    conn: Connection,
    config: MemoryConfig,
}

impl MemoryStore {
    /// Creates a new MemoryStore wrapping an existing connection.
    pub fn new(conn: Connection, config: MemoryConfig) -> Self {
        Self { conn, config }
    }

    /// Creates the `user_memories` table and its indexes. Idempotent.
    pub async fn init_schema(&self) -> Result<(), SolaceError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS user_memories (
                        id TEXT PRIMARY KEY NOT NULL,
                        user_id TEXT NOT NULL,
                        conversation_id TEXT,
                        content TEXT NOT NULL,
                        embedding NOT NULL,
                        metadata TEXT NOT NULL,
                        created_at TEXT NOT NULL,
                        updated_at TEXT NOT NULL
                    );

                    CREATE INDEX IF NOT EXISTS idx_user_memories_user
                        ON user_memories(user_id);
                    CREATE INDEX IF NOT EXISTS idx_user_memories_user_updated
                        ON user_memories(user_id, updated_at);",
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Writes one memory record and returns it.
    pub async fn write(
        &self,
        user_id: &str,
        content: &str,
        embedding: &[f32],
        metadata: MemoryMetadata,
        conversation_id: Option<&str>,
    ) -> Result<MemoryRecord, SolaceError> {
        let now = now_timestamp();
        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            conversation_id: conversation_id.map(str::to_string),
            content: content.to_string(),
            embedding: StoredEmbedding::Vector(embedding.to_vec()),
            metadata,
            created_at: now.clone(),
            updated_at: now,
        };

        let id = record.id.clone();
        let user = record.user_id.clone();
        let conversation = record.conversation_id.clone();
        let content = record.content.clone();
        let blob = vec_to_blob(embedding);
        let metadata_json = serde_json::to_string(&record.metadata)
            .map_err(|e| SolaceError::Internal(format!("metadata serialization: {e}")))?;
        let created = record.created_at.clone();
        let updated = record.updated_at.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO user_memories (id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    rusqlite::params![id, user, conversation, content, blob, metadata_json, created, updated],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;

        metrics::counter!("solace_memory_writes_total", "kind" => record.metadata.kind.as_str())
            .increment(1);
        debug!(user_id = %record.user_id, kind = %record.metadata.kind.as_str(), "stored memory");
        Ok(record)
    }

    /// Writes the rolling interaction summary for one exchange and prunes
    /// interaction rows past the retention cap, in a single transaction.
    pub async fn write_interaction(
        &self,
        user_id: &str,
        user_message: &str,
        assistant_reply: &str,
        embedding: &[f32],
        conversation_id: Option<&str>,
    ) -> Result<MemoryRecord, SolaceError> {
        let content = interaction_summary(user_message, assistant_reply);

        let mut metadata = MemoryMetadata::new(MemoryKind::Interaction, Priority::Low);
        metadata.conversation_id = conversation_id.map(str::to_string);
        metadata.extra.insert(
            "user_message_length".to_string(),
            serde_json::json!(user_message.chars().count()),
        );
        metadata.extra.insert(
            "ai_response_length".to_string(),
            serde_json::json!(assistant_reply.chars().count()),
        );

        let now = now_timestamp();
        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            conversation_id: conversation_id.map(str::to_string),
            content: content.clone(),
            embedding: StoredEmbedding::Vector(embedding.to_vec()),
            metadata,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let id = record.id.clone();
        let user = user_id.to_string();
        let conversation = record.conversation_id.clone();
        let blob = vec_to_blob(embedding);
        let metadata_json = serde_json::to_string(&record.metadata)
            .map_err(|e| SolaceError::Internal(format!("metadata serialization: {e}")))?;
        let cap = self.config.interaction_cap as i64;

        let pruned = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO user_memories (id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                    rusqlite::params![id, user, conversation, content, blob, metadata_json, now],
                )?;
                // Newest rows win; rowid breaks ties between identical
                // millisecond timestamps.
                let pruned = tx.execute(
                    "DELETE FROM user_memories
                     WHERE user_id = ?1
                       AND json_extract(metadata, '$.type') = 'interaction'
                       AND id NOT IN (
                           SELECT id FROM user_memories
                           WHERE user_id = ?1
                             AND json_extract(metadata, '$.type') = 'interaction'
                           ORDER BY created_at DESC, rowid DESC
                           LIMIT ?2
                       )",
                    rusqlite::params![user, cap],
                )?;
                tx.commit()?;
                Ok(pruned)
            })
            .await
            .map_err(storage_err)?;

        if pruned > 0 {
            metrics::counter!("solace_memory_interactions_pruned_total").increment(pruned as u64);
            debug!(user_id, pruned, "pruned old interaction memories");
        }
        Ok(record)
    }

    /// Number of memories stored for a user.
    pub async fn count_for_user(&self, user_id: &str) -> Result<usize, SolaceError> {
        let user = user_id.to_string();
        self.conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM user_memories WHERE user_id = ?1",
                    rusqlite::params![user],
                    |row| row.get(0),
                )?;
                Ok(count as usize)
            })
            .await
            .map_err(storage_err)
    }

    /// All memories for a user, most recently updated first.
    pub async fn load_for_user(&self, user_id: &str) -> Result<Vec<MemoryRecord>, SolaceError> {
        let user = user_id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {SELECT_COLUMNS} FROM user_memories WHERE user_id = ?1 ORDER BY updated_at DESC"
                ))?;
                let records = stmt
                    .query_map(rusqlite::params![user], |row| Ok(row_to_record(row)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(records)
            })
            .await
            .map_err(storage_err)
    }

}

/// Convert a rusqlite Row to a MemoryRecord.
///
/// Lenient by design: corrupt metadata falls back to defaults and unexpected
/// embedding column types read as an empty encoded embedding, so one bad row
/// never sinks a whole listing.
fn row_to_record(row: &rusqlite::Row) -> MemoryRecord {
    let embedding = match row.get_ref(4) {
        Ok(ValueRef::Blob(blob)) => StoredEmbedding::Vector(blob_to_vec(blob)),
        Ok(ValueRef::Text(text)) => {
            StoredEmbedding::Encoded(String::from_utf8_lossy(text).into_owned())
        }
        _ => StoredEmbedding::Encoded(String::new()),
    };

    let metadata_json: String = row.get(5).unwrap_or_default();
    let metadata: MemoryMetadata = serde_json::from_str(&metadata_json).unwrap_or_default();

    MemoryRecord {
        id: row.get(0).unwrap_or_default(),
        user_id: row.get(1).unwrap_or_default(),
        conversation_id: row.get(2).unwrap_or(None),
        content: row.get(3).unwrap_or_default(),
        embedding,
        metadata,
        created_at: row.get(6).unwrap_or_default(),
        updated_at: row.get(7).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_store() -> (MemoryStore, Connection) {
        let conn = Connection::open_in_memory().await.unwrap();
        let store = MemoryStore::new(conn.clone(), MemoryConfig::default());
        store.init_schema().await.unwrap();
        (store, conn)
    }

    fn unit_vec(dim: usize, hot: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[hot] = 1.0;
        v
    }

    #[tokio::test]
    async fn write_and_load_roundtrip() {
        let (store, _conn) = setup_store().await;

        let mut metadata = MemoryMetadata::new(MemoryKind::Person, Priority::High);
        metadata.person_name = Some("Sam".to_string());
        let written = store
            .write("user-1", "Sam is user's friend", &unit_vec(8, 0), metadata, Some("conv-1"))
            .await
            .unwrap();

        let loaded = store.load_for_user("user-1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, written.id);
        assert_eq!(loaded[0].content, "Sam is user's friend");
        assert_eq!(loaded[0].metadata.kind, MemoryKind::Person);
        assert_eq!(loaded[0].metadata.person_name.as_deref(), Some("Sam"));
        assert_eq!(loaded[0].conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(loaded[0].embedding.decode().unwrap(), unit_vec(8, 0));
    }

    #[tokio::test]
    async fn count_isolated_per_user() {
        let (store, _conn) = setup_store().await;
        let meta = MemoryMetadata::new(MemoryKind::Fact, Priority::Medium);

        store
            .write("alice", "likes tea", &unit_vec(4, 0), meta.clone(), None)
            .await
            .unwrap();
        store
            .write("bob", "likes coffee", &unit_vec(4, 1), meta, None)
            .await
            .unwrap();

        assert_eq!(store.count_for_user("alice").await.unwrap(), 1);
        assert_eq!(store.count_for_user("bob").await.unwrap(), 1);
        assert_eq!(store.count_for_user("carol").await.unwrap(), 0);
        assert!(store.load_for_user("alice").await.unwrap().iter().all(|r| r.user_id == "alice"));
    }

    #[tokio::test]
    async fn interaction_prune_keeps_newest_cap() {
        let config = MemoryConfig {
            interaction_cap: 3,
            ..MemoryConfig::default()
        };
        let conn = Connection::open_in_memory().await.unwrap();
        let store = MemoryStore::new(conn.clone(), config);
        store.init_schema().await.unwrap();

        for i in 0..5 {
            store
                .write_interaction("user-1", &format!("message {i}"), "a reply", &unit_vec(4, 0), None)
                .await
                .unwrap();
        }

        let records = store.load_for_user("user-1").await.unwrap();
        assert_eq!(records.len(), 3);
        // The newest three survive.
        let contents: Vec<&str> = records.iter().map(|r| r.content.as_str()).collect();
        assert!(contents.iter().any(|c| c.contains("message 4")));
        assert!(contents.iter().any(|c| c.contains("message 2")));
        assert!(!contents.iter().any(|c| c.contains("message 0")));
    }

    #[tokio::test]
    async fn interaction_prune_spares_non_interaction_memories() {
        let config = MemoryConfig {
            interaction_cap: 1,
            ..MemoryConfig::default()
        };
        let conn = Connection::open_in_memory().await.unwrap();
        let store = MemoryStore::new(conn.clone(), config);
        store.init_schema().await.unwrap();

        store
            .write(
                "user-1",
                "User's dog is named Max",
                &unit_vec(4, 0),
                MemoryMetadata::new(MemoryKind::Fact, Priority::High),
                None,
            )
            .await
            .unwrap();
        for i in 0..3 {
            store
                .write_interaction("user-1", &format!("m{i}"), "r", &unit_vec(4, 1), None)
                .await
                .unwrap();
        }

        let records = store.load_for_user("user-1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|r| r.metadata.kind == MemoryKind::Fact));
        assert_eq!(
            records
                .iter()
                .filter(|r| r.metadata.kind == MemoryKind::Interaction)
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn interaction_content_truncates_long_turns() {
        let (store, _conn) = setup_store().await;
        let long_message = "x".repeat(500);
        let long_reply = "y".repeat(500);

        let record = store
            .write_interaction("user-1", &long_message, &long_reply, &unit_vec(4, 0), None)
            .await
            .unwrap();

        assert!(record.content.starts_with("User said: "));
        assert!(record.content.contains(&"x".repeat(100)));
        assert!(!record.content.contains(&"x".repeat(101)));
        assert!(record.content.contains(&"y".repeat(50)));
        assert!(!record.content.contains(&"y".repeat(51)));
        assert_eq!(record.metadata.extra["user_message_length"], 500);
    }

    #[tokio::test]
    async fn legacy_text_embedding_reads_as_encoded() {
        let (store, conn) = setup_store().await;

        // Row written by an older deployment: embedding stored as JSON text.
        conn.call(|conn| {
            conn.execute(
                "INSERT INTO user_memories (id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at) VALUES ('legacy-1', 'user-1', NULL, 'old fact', '[1.0, 0.0]', '{\"type\": \"fact\", \"priority\": \"low\"}', '2026-01-01T00:00:00.000Z', '2026-01-01T00:00:00.000Z')",
                [],
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .unwrap();

        let records = store.load_for_user("user-1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].embedding,
            StoredEmbedding::Encoded("[1.0, 0.0]".to_string())
        );
        assert_eq!(records[0].embedding.decode().unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn corrupt_metadata_reads_as_default() {
        let (store, conn) = setup_store().await;
        conn.call(|conn| {
            conn.execute(
                "INSERT INTO user_memories (id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at) VALUES ('bad-1', 'user-1', NULL, 'content', x'0000803f', 'not json', '2026-01-01T00:00:00.000Z', '2026-01-01T00:00:00.000Z')",
                [],
            )?;
            Ok::<_, rusqlite::Error>(())
        })
        .await
        .unwrap();

        let records = store.load_for_user("user-1").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].metadata.kind, MemoryKind::Fact);
    }

    #[tokio::test]
    async fn load_for_user_orders_by_updated_at_desc() {
        let (store, conn) = setup_store().await;
        for (id, ts) in [("a", "2026-01-01"), ("b", "2026-03-01"), ("c", "2026-02-01")] {
            let stamp = format!("{ts}T00:00:00.000Z");
            let id = id.to_string();
            conn.call(move |conn| {
                conn.execute(
                    "INSERT INTO user_memories (id, user_id, conversation_id, content, embedding, metadata, created_at, updated_at) VALUES (?1, 'user-1', NULL, ?1, x'0000803f', '{\"type\": \"fact\", \"priority\": \"low\"}', ?2, ?2)",
                    rusqlite::params![id, stamp],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();
        }

        let records = store.load_for_user("user-1").await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "b");
        assert_eq!(records[1].id, "c");
        assert_eq!(records[2].id, "a");
    }
}
