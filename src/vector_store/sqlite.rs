//! SQLite-based vector store implementation.
//!
//! Uses SQLite with cosine similarity computed in Rust for simplicity.
//! For production use cases with large datasets, consider using sqlite-vec
//! extension or a dedicated vector database.

use super::{cosine_similarity, Document, IndexedSource, SearchResult, VectorStore};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    source_id TEXT NOT NULL,
    source_title TEXT NOT NULL,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL,
    chunk_order INTEGER NOT NULL,
    indexed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_source_id ON documents(source_id);
CREATE INDEX IF NOT EXISTS idx_documents_indexed_at ON documents(indexed_at);
"#;

/// SQLite-based vector store.
pub struct SqliteVectorStore {
    conn: Mutex<Connection>,
}

impl SqliteVectorStore {
    /// Create a new SQLite vector store.
    #[instrument(skip_all)]
    pub fn new(path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;

        info!("Initialized SQLite vector store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite vector store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding
            .iter()
            .flat_map(|f| f.to_le_bytes())
            .collect()
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

    fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
        let id_str: String = row.get(0)?;
        let embedding_bytes: Vec<u8> = row.get(4)?;
        let indexed_at_str: String = row.get(6)?;

        Ok(Document {
            id: uuid::Uuid::parse_str(&id_str).unwrap_or_default(),
            source_id: row.get(1)?,
            source_title: row.get(2)?,
            content: row.get(3)?,
            embedding: Self::bytes_to_embedding(&embedding_bytes),
            chunk_order: row.get(5)?,
            indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    #[instrument(skip(self, doc))]
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let embedding_bytes = Self::embedding_to_bytes(&doc.embedding);

        conn.execute(
            r#"
            INSERT OR REPLACE INTO documents
            (id, source_id, source_title, content, embedding, chunk_order, indexed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                doc.id.to_string(),
                doc.source_id,
                doc.source_title,
                doc.content,
                embedding_bytes,
                doc.chunk_order,
                doc.indexed_at.to_rfc3339(),
            ],
        )?;

        debug!("Upserted document {}", doc.id);
        Ok(())
    }

    #[instrument(skip(self, docs))]
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let tx = conn.unchecked_transaction()?;

        for doc in docs {
            let embedding_bytes = Self::embedding_to_bytes(&doc.embedding);

            tx.execute(
                r#"
                INSERT OR REPLACE INTO documents
                (id, source_id, source_title, content, embedding, chunk_order, indexed_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    doc.id.to_string(),
                    doc.source_id,
                    doc.source_title,
                    doc.content,
                    embedding_bytes,
                    doc.chunk_order,
                    doc.indexed_at.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Batch upserted {} documents", docs.len());
        Ok(docs.len())
    }

    #[instrument(skip(self, query_embedding))]
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        self.search_with_threshold(query_embedding, limit, 0.0).await
    }

    #[instrument(skip(self, query_embedding))]
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, source_id, source_title, content, embedding, chunk_order, indexed_at
            FROM documents
            "#,
        )?;

        let docs = stmt.query_map([], Self::row_to_document)?;

        let mut results: Vec<SearchResult> = docs
            .filter_map(|doc_result| doc_result.ok())
            .map(|doc| {
                let score = cosine_similarity(query_embedding, &doc.embedding);
                SearchResult { document: doc, score }
            })
            .filter(|r| r.score >= min_score)
            .collect();

        // Sort by score descending
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);

        debug!("Found {} matching documents", results.len());
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn delete_by_source(&self, source_id: &str) -> Result<usize> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let deleted = conn.execute(
            "DELETE FROM documents WHERE source_id = ?1",
            params![source_id],
        )?;

        info!("Deleted {} documents for source {}", deleted, source_id);
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn list_sources(&self) -> Result<Vec<IndexedSource>> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source_id, source_title, COUNT(*) as chunk_count,
                   MAX(indexed_at) as indexed_at
            FROM documents
            GROUP BY source_id
            ORDER BY indexed_at DESC
            "#,
        )?;

        let sources = stmt.query_map([], |row| {
            let indexed_at_str: String = row.get(3)?;
            Ok(IndexedSource {
                source_id: row.get(0)?,
                source_title: row.get(1)?,
                chunk_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        let result: Vec<IndexedSource> = sources.filter_map(|s| s.ok()).collect();
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn get_source(&self, source_id: &str) -> Result<Option<IndexedSource>> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT source_id, source_title, COUNT(*) as chunk_count,
                   MAX(indexed_at) as indexed_at
            FROM documents
            WHERE source_id = ?1
            GROUP BY source_id
            "#,
        )?;

        let source = stmt.query_row(params![source_id], |row| {
            let indexed_at_str: String = row.get(3)?;
            Ok(IndexedSource {
                source_id: row.get(0)?,
                source_title: row.get(1)?,
                chunk_count: row.get(2)?,
                indexed_at: DateTime::parse_from_rfc3339(&indexed_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        });

        match source {
            Ok(s) => Ok(Some(s)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_source_indexed(&self, source_id: &str) -> Result<bool> {
        let source = self.get_source(source_id).await?;
        Ok(source.is_some())
    }

    #[instrument(skip(self))]
    async fn get_by_source(&self, source_id: &str) -> Result<Vec<Document>> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let mut stmt = conn.prepare(
            r#"
            SELECT id, source_id, source_title, content, embedding, chunk_order, indexed_at
            FROM documents
            WHERE source_id = ?1
            ORDER BY chunk_order
            "#,
        )?;

        let docs = stmt.query_map(params![source_id], Self::row_to_document)?;

        let result: Vec<Document> = docs.filter_map(|d| d.ok()).collect();
        debug!("Found {} documents for source {}", result.len(), source_id);
        Ok(result)
    }

    async fn document_count(&self) -> Result<usize> {
        let conn = self.conn.lock().map_err(|e| {
            SvarError::VectorStore(format!("Failed to acquire lock: {}", e))
        })?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_vector_store() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let doc = Document::new(
            "guide.md".to_string(),
            "guide".to_string(),
            "This is test content".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );

        store.upsert(&doc).await.unwrap();

        let sources = store.list_sources().await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source_id, "guide.md");

        let results = store.search(&[1.0, 0.0, 0.0], 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);

        let deleted = store.delete_by_source("guide.md").await.unwrap();
        assert_eq!(deleted, 1);

        let sources = store.list_sources().await.unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_round_trips_through_blob() {
        let store = SqliteVectorStore::in_memory().unwrap();

        let doc = Document::new(
            "a.txt".to_string(),
            "a".to_string(),
            "content".to_string(),
            vec![0.25, -1.5, 3.0],
            0,
        );
        store.upsert(&doc).await.unwrap();

        let chunks = store.get_by_source("a.txt").await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].embedding, vec![0.25, -1.5, 3.0]);
    }

    #[tokio::test]
    async fn test_get_by_source_ordering() {
        let store = SqliteVectorStore::in_memory().unwrap();

        for order in [2, 0, 1] {
            let doc = Document::new(
                "b.txt".to_string(),
                "b".to_string(),
                format!("chunk {}", order),
                vec![1.0],
                order,
            );
            store.upsert(&doc).await.unwrap();
        }

        let chunks = store.get_by_source("b.txt").await.unwrap();
        let orders: Vec<i32> = chunks.iter().map(|c| c.chunk_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
