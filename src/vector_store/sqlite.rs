//! SQLite-based evidence store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider using sqlite-vec
//! extension or a dedicated vector database.

use super::{cosine_similarity, EvidenceChunk, EvidenceStore, ScoredChunk};
use crate::error::{GranskeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    source TEXT NOT NULL,
    user TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_user ON chunks(user);
CREATE INDEX IF NOT EXISTS idx_chunks_created_at ON chunks(created_at);
"#;

/// SQLite-based evidence store.
pub struct SqliteEvidenceStore {
    conn: Mutex<Connection>,
}

impl SqliteEvidenceStore {
    /// Create a new SQLite evidence store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL keeps retrieval for one query from blocking on ingestion of another
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite evidence store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite evidence store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let arr: [u8; 4] = chunk.try_into().unwrap_or_default();
                f32::from_le_bytes(arr)
            })
            .collect()
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| GranskeError::VectorStore(format!("Failed to acquire lock: {}", e)))
    }
}

#[async_trait]
impl EvidenceStore for SqliteEvidenceStore {
    #[instrument(skip(self, chunk))]
    async fn upsert(&self, chunk: &EvidenceChunk) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            INSERT OR REPLACE INTO chunks (id, text, embedding, source, user, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                chunk.id.to_string(),
                chunk.text,
                Self::embedding_to_bytes(&chunk.embedding),
                chunk.source,
                chunk.user,
                chunk.created_at.to_rfc3339(),
            ],
        )?;

        debug!("Upserted chunk {}", chunk.id);
        Ok(())
    }

    #[instrument(skip(self, batch))]
    async fn upsert_batch(&self, batch: &[EvidenceChunk]) -> Result<usize> {
        let conn = self.lock_conn()?;

        let tx = conn.unchecked_transaction()?;

        for chunk in batch {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO chunks (id, text, embedding, source, user, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    chunk.id.to_string(),
                    chunk.text,
                    Self::embedding_to_bytes(&chunk.embedding),
                    chunk.source,
                    chunk.user,
                    chunk.created_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} chunks", batch.len());
        Ok(batch.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn query(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        user: &str,
    ) -> Result<Vec<ScoredChunk>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, text, embedding, source, user, created_at FROM chunks WHERE user = ?1",
        )?;

        let rows = stmt.query_map(params![user], |row| {
            let id_str: String = row.get(0)?;
            let embedding_bytes: Vec<u8> = row.get(2)?;
            let created_at_str: String = row.get(5)?;

            Ok(EvidenceChunk {
                id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
                text: row.get(1)?,
                embedding: Self::bytes_to_embedding(&embedding_bytes),
                source: row.get(3)?,
                user: row.get(4)?,
                created_at: DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let mut results: Vec<ScoredChunk> = rows
            .filter_map(|chunk_result| chunk_result.ok())
            .map(|chunk| {
                let score = cosine_similarity(query_embedding, &chunk.embedding);
                ScoredChunk { chunk, score }
            })
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        debug!("Found {} matching chunks for user {}", results.len(), user);
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn reset(&self, user: &str) -> Result<usize> {
        let conn = self.lock_conn()?;

        let deleted = conn.execute("DELETE FROM chunks WHERE user = ?1", params![user])?;

        info!("Deleted {} chunks for user {}", deleted, user);
        Ok(deleted)
    }

    async fn count(&self, user: &str) -> Result<usize> {
        let conn = self.lock_conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE user = ?1",
            params![user],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self, user: &str) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source, MAX(created_at) as latest
            FROM chunks
            WHERE user = ?1
            GROUP BY source
            ORDER BY latest DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user], |row| row.get::<_, String>(0))?;
        let sources: Vec<String> = rows.filter_map(|r| r.ok()).collect();
        Ok(sources)
    }
}
