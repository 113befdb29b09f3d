//! Vector store abstraction for Svar.
//!
//! Provides a trait-based interface for different vector database backends.

mod memory;
mod sqlite;

pub use memory::MemoryVectorStore;
pub use sqlite::SqliteVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document chunk stored in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique chunk ID.
    pub id: Uuid,
    /// Source this chunk belongs to (relative file path).
    pub source_id: String,
    /// Source title (file stem).
    pub source_title: String,
    /// Text content of this chunk.
    pub content: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
    /// Order of this chunk in the source.
    pub chunk_order: i32,
    /// When this chunk was indexed.
    pub indexed_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document chunk.
    pub fn new(
        source_id: String,
        source_title: String,
        content: String,
        embedding: Vec<f32>,
        chunk_order: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id,
            source_title,
            content,
            embedding,
            chunk_order,
            indexed_at: Utc::now(),
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document chunk.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Summary information about an indexed source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedSource {
    /// Source ID (relative file path).
    pub source_id: String,
    /// Source title.
    pub source_title: String,
    /// Number of indexed chunks.
    pub chunk_count: u32,
    /// When the source was indexed.
    pub indexed_at: DateTime<Utc>,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a document chunk with its embedding.
    async fn upsert(&self, doc: &Document) -> Result<()>;

    /// Bulk upsert document chunks.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for similar chunks.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Search with a minimum similarity threshold.
    async fn search_with_threshold(
        &self,
        query_embedding: &[f32],
        limit: usize,
        min_score: f32,
    ) -> Result<Vec<SearchResult>>;

    /// Delete chunks by source ID.
    async fn delete_by_source(&self, source_id: &str) -> Result<usize>;

    /// List all indexed sources.
    async fn list_sources(&self) -> Result<Vec<IndexedSource>>;

    /// Get a specific source's information.
    async fn get_source(&self, source_id: &str) -> Result<Option<IndexedSource>>;

    /// Check if a source is indexed.
    async fn is_source_indexed(&self, source_id: &str) -> Result<bool>;

    /// Get all chunks for a source, ordered.
    async fn get_by_source(&self, source_id: &str) -> Result<Vec<Document>>;

    /// Get total chunk count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
