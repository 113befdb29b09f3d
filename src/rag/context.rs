//! Context building for RAG responses.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{SearchResult, VectorStore};
use std::sync::Arc;

/// Builds context from search results for RAG.
pub struct ContextBuilder {
    vector_store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    max_chunks: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            max_chunks: 5,
            min_score: 0.3,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Build context for a query.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .vector_store
            .search_with_threshold(&query_embedding, self.max_chunks, self.min_score)
            .await?;

        Ok(results.into_iter().map(ContextChunk::from).collect())
    }

    /// Build context from raw search results.
    pub fn from_results(results: Vec<SearchResult>) -> Vec<ContextChunk> {
        results.into_iter().map(ContextChunk::from).collect()
    }
}

/// Format context chunks for inclusion in a prompt.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            format!(
                "---\n[{}] {} ({})\n{}\n---",
                i + 1,
                chunk.source_title,
                chunk.source_id,
                chunk.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format context chunks for display to the user.
pub fn format_context_for_display(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| {
            format!(
                "{} ({}) score: {:.2}",
                chunk.source_title, chunk.source_id, chunk.score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::Document;

    #[test]
    fn test_format_context_for_prompt() {
        let chunks = vec![ContextChunk {
            source_id: "guide.md".to_string(),
            source_title: "guide".to_string(),
            content: "Some content".to_string(),
            score: 0.9,
        }];

        let formatted = format_context_for_prompt(&chunks);
        assert!(formatted.contains("[1] guide (guide.md)"));
        assert!(formatted.contains("Some content"));
    }

    #[test]
    fn test_from_results() {
        let doc = Document::new(
            "a.txt".to_string(),
            "a".to_string(),
            "text".to_string(),
            vec![1.0],
            0,
        );
        let chunks = ContextBuilder::from_results(vec![crate::vector_store::SearchResult {
            document: doc,
            score: 0.8,
        }]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source_id, "a.txt");
        assert!((chunks[0].score - 0.8).abs() < f32::EPSILON);
    }
}
