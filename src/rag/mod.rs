//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Provides the ability to ask questions and get answers grounded in the
//! document knowledge base.

pub mod context;
mod response;

pub use context::ContextBuilder;
pub use response::{RagEngine, RagResponse};

use crate::vector_store::SearchResult;

/// A search result with formatted context for display.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Source ID (relative file path).
    pub source_id: String,
    /// Source title.
    pub source_title: String,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            source_id: result.document.source_id,
            source_title: result.document.source_title,
            content: result.document.content,
            score: result.score,
        }
    }
}
