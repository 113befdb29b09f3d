//! Pipeline orchestrator for Svar.
//!
//! Coordinates the ingestion pipeline from document loading to indexing.

use crate::chunking::{chunk_text, ChunkingConfig};
use crate::config::Settings;
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::ingest::ParseCache;
use crate::loader::{load_directory, SourceDocument};
use crate::vector_store::{Document, SqliteVectorStore, VectorStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the Svar pipeline.
pub struct Orchestrator {
    settings: Settings,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<SqliteVectorStore>,
}

impl Orchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(settings: Settings) -> Result<Self> {
        let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings));
        let vector_store = Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?);

        Ok(Self {
            settings,
            embedder,
            vector_store,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<SqliteVectorStore>,
    ) -> Self {
        Self {
            settings,
            embedder,
            vector_store,
        }
    }

    /// Get a reference to the vector store (as trait object).
    pub fn vector_store(&self) -> Arc<dyn VectorStore> {
        self.vector_store.clone() as Arc<dyn VectorStore>
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ingest a directory: load, chunk, embed, and index each document.
    ///
    /// Files already marked in the parse cache are skipped unless `force` is
    /// set. The cache is written back once after the whole batch; a crash
    /// mid-batch leaves it stale and the affected files are simply re-parsed
    /// on the next run.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn ingest_directory(&self, dir: &Path, force: bool) -> Result<IngestResult> {
        let mut cache = ParseCache::load(&self.settings.cache_path());
        let documents = load_directory(dir, &self.settings.ingestion.extensions)?;
        info!("Found {} candidate documents in {}", documents.len(), dir.display());

        let mut result = IngestResult::default();

        for document in documents {
            if !force && cache.is_done(&document.source_id) {
                info!("{} is already ingested, skipping", document.source_id);
                result.files_skipped += 1;
                continue;
            }

            let indexed = self.index_document(&document).await?;
            cache.mark_done(&document.source_id);
            result.files_processed += 1;
            result.chunks_indexed += indexed;
        }

        cache.save()?;

        Ok(result)
    }

    /// Chunk, embed, and index a single document, replacing prior chunks.
    async fn index_document(&self, document: &SourceDocument) -> Result<usize> {
        let config = ChunkingConfig {
            target_chars: self.settings.ingestion.chunk_chars,
            overlap_chars: self.settings.ingestion.chunk_overlap_chars,
        };
        let chunks = chunk_text(&document.content, &config);

        if chunks.is_empty() {
            info!("{} is empty, nothing to index", document.source_id);
            return Ok(0);
        }

        info!("Indexing {} chunks from {}", chunks.len(), document.source_id);

        // Delete existing chunks for this source
        self.vector_store.delete_by_source(&document.source_id).await?;

        // Generate embeddings in batch
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let documents: Vec<Document> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                Document::new(
                    document.source_id.clone(),
                    document.title.clone(),
                    chunk.content,
                    embedding,
                    chunk.order,
                )
            })
            .collect();

        let count = self.vector_store.upsert_batch(&documents).await?;

        Ok(count)
    }
}

/// Result of an ingestion batch.
#[derive(Debug, Default)]
pub struct IngestResult {
    /// Number of files parsed and indexed.
    pub files_processed: usize,
    /// Number of files skipped via the parse cache.
    pub files_skipped: usize,
    /// Total chunks indexed.
    pub chunks_indexed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as SvarResult;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> SvarResult<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> SvarResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    fn test_settings(dir: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.ingestion.cache_path = dir.join("cache.json").to_string_lossy().to_string();
        settings.vector_store.sqlite_path = dir.join("vectors.db").to_string_lossy().to_string();
        settings
    }

    #[tokio::test]
    async fn test_ingest_directory_indexes_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let docs_dir = dir.path().join("docs");
        std::fs::create_dir(&docs_dir).unwrap();
        std::fs::write(docs_dir.join("a.txt"), "Some document content.").unwrap();
        std::fs::write(docs_dir.join("b.md"), "Other content.").unwrap();

        let settings = test_settings(dir.path());
        let orchestrator = Orchestrator::with_components(
            settings.clone(),
            Arc::new(FixedEmbedder),
            Arc::new(SqliteVectorStore::in_memory().unwrap()),
        );

        let result = orchestrator.ingest_directory(&docs_dir, false).await.unwrap();
        assert_eq!(result.files_processed, 2);
        assert_eq!(result.files_skipped, 0);
        assert_eq!(result.chunks_indexed, 2);

        // Cache now marks both files; a second run skips them
        let result = orchestrator.ingest_directory(&docs_dir, false).await.unwrap();
        assert_eq!(result.files_processed, 0);
        assert_eq!(result.files_skipped, 2);

        // Force re-ingests regardless of the cache
        let result = orchestrator.ingest_directory(&docs_dir, true).await.unwrap();
        assert_eq!(result.files_processed, 2);
    }

    #[test]
    fn test_embedder_accessor_shares_pipeline_embedder() {
        let embedder: Arc<dyn Embedder> = Arc::new(FixedEmbedder);
        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            embedder.clone(),
            Arc::new(SqliteVectorStore::in_memory().unwrap()),
        );

        assert!(Arc::ptr_eq(&embedder, &orchestrator.embedder()));
    }

    #[tokio::test]
    async fn test_reingest_replaces_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let docs_dir = dir.path().join("docs");
        std::fs::create_dir(&docs_dir).unwrap();
        std::fs::write(docs_dir.join("a.txt"), "Version one.").unwrap();

        let settings = test_settings(dir.path());
        let store = Arc::new(SqliteVectorStore::in_memory().unwrap());
        let orchestrator = Orchestrator::with_components(
            settings,
            Arc::new(FixedEmbedder),
            store,
        );

        orchestrator.ingest_directory(&docs_dir, false).await.unwrap();
        std::fs::write(docs_dir.join("a.txt"), "Version two.").unwrap();
        orchestrator.ingest_directory(&docs_dir, true).await.unwrap();

        let chunks = orchestrator.vector_store().get_by_source("a.txt").await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Version two.");
    }
}
