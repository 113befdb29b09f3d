//! Content chunking for document ingestion.
//!
//! Splits document text into ordered chunks sized for embedding, preferring
//! paragraph boundaries and keeping a small overlap between neighbors so
//! retrieval does not lose context at the seams.

use serde::{Deserialize, Serialize};

/// A chunk of document content ready for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentChunk {
    /// Chunk text.
    pub content: String,
    /// Order of this chunk in the source document.
    pub order: i32,
}

/// Chunking configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Target chunk size in characters.
    pub target_chars: usize,
    /// Overlap between consecutive chunks in characters.
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chars: 1500,
            overlap_chars: 200,
        }
    }
}

/// Split text into chunks along paragraph boundaries.
///
/// Paragraphs are accumulated until the target size is reached; a paragraph
/// longer than the target is split on char boundaries with overlap.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<ContentChunk> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut pieces: Vec<String> = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if paragraph.len() > config.target_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            pieces.extend(split_long_paragraph(paragraph, config));
            continue;
        }

        if !current.is_empty() && current.len() + paragraph.len() + 2 > config.target_chars {
            pieces.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, content)| ContentChunk {
            content,
            order: i as i32,
        })
        .collect()
}

/// Split an oversized paragraph into overlapping windows on char boundaries.
fn split_long_paragraph(paragraph: &str, config: &ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    let target = config.target_chars.max(1);
    let overlap = config.overlap_chars.min(target.saturating_sub(1));
    let step = target - overlap;

    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + target).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunks = chunk_text("", &ChunkingConfig::default());
        assert!(chunks.is_empty());

        let chunks = chunk_text("   \n\n  ", &ChunkingConfig::default());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunk_text("Hello world.", &ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Hello world.");
        assert_eq!(chunks[0].order, 0);
    }

    #[test]
    fn test_paragraphs_grouped_up_to_target() {
        let config = ChunkingConfig {
            target_chars: 30,
            overlap_chars: 0,
        };
        let text = "First paragraph.\n\nSecond one.\n\nThird paragraph here.";
        let chunks = chunk_text(text, &config);

        assert!(chunks.len() >= 2);
        // Order is sequential
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order, i as i32);
        }
        // All paragraph text survives
        let joined: String = chunks.iter().map(|c| c.content.as_str()).collect();
        assert!(joined.contains("First paragraph."));
        assert!(joined.contains("Third paragraph here."));
    }

    #[test]
    fn test_long_paragraph_split_with_overlap() {
        let config = ChunkingConfig {
            target_chars: 10,
            overlap_chars: 3,
        };
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = chunk_text(text, &config);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.content.chars().count() <= 10);
        }
        // Overlap: each window starts 7 chars after the previous
        assert!(chunks[1].content.starts_with("hij"));
    }
}
