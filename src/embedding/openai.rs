//! Embeddings over the OpenAI-compatible API.
//!
//! Works against both the hosted API and local servers, depending on the
//! client handed in.

use super::Embedder;
use crate::config::Settings;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Embedder backed by an OpenAI-compatible embeddings endpoint.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder for the backend selected in settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let model = match settings.model.backend {
            crate::config::ModelBackend::OpenAI => settings.embedding.model.clone(),
            crate::config::ModelBackend::Local => settings.embedding.local_model.clone(),
        };
        Self::with_client(
            create_client(&settings.model),
            &model,
            settings.embedding.dimensions as usize,
        )
    }

    /// Create an embedder with an explicit client, model, and dimensions.
    pub fn with_client(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
        dimensions: usize,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            dimensions,
        }
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| SvarError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        // The API has a limit on batch size, process in chunks
        const BATCH_SIZE: usize = 100;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let input: Vec<String> = chunk.to_vec();

            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(input))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| SvarError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                SvarError::ModelApi(format!("Embedding API error: {}", e))
            })?;

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            for embedding_data in embeddings {
                all_embeddings.push(embedding_data.embedding);
            }
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelBackend, Settings};

    #[test]
    fn test_embedder_from_settings_uses_backend_model() {
        let mut settings = Settings::default();
        let embedder = OpenAIEmbedder::from_settings(&settings);
        assert_eq!(embedder.dimensions(), 1536);
        assert_eq!(embedder.model, "text-embedding-3-small");

        settings.model.backend = ModelBackend::Local;
        let embedder = OpenAIEmbedder::from_settings(&settings);
        assert_eq!(embedder.model, "nomic-embed-text");
    }
}
