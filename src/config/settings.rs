//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub embedding: EmbeddingSettings,
    pub ingestion: IngestionSettings,
    pub vector_store: VectorStoreSettings,
    pub retrieval: RetrievalSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.svar".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language model backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Hosted OpenAI API (default).
    #[default]
    OpenAI,
    /// Locally served OpenAI-compatible endpoint (Ollama, llama.cpp, etc.).
    Local,
}

impl std::str::FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "hosted" => Ok(ModelBackend::OpenAI),
            "local" | "ollama" => Ok(ModelBackend::Local),
            _ => Err(format!("Unknown model backend: {}", s)),
        }
    }
}

impl std::fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBackend::OpenAI => write!(f, "openai"),
            ModelBackend::Local => write!(f, "local"),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model backend (openai, local).
    pub backend: ModelBackend,
    /// Chat model to use.
    pub chat_model: String,
    /// Chat model when the local backend is selected.
    pub local_chat_model: String,
    /// Base URL of the local OpenAI-compatible endpoint.
    pub local_base_url: String,
    /// Maximum tool-calling iterations per agent run.
    pub max_agent_iterations: usize,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            backend: ModelBackend::OpenAI,
            chat_model: "gpt-4o-mini".to_string(),
            local_chat_model: "llama3.1".to_string(),
            local_base_url: "http://localhost:11434/v1".to_string(),
            max_agent_iterations: 10,
        }
    }
}

impl ModelSettings {
    /// The chat model for the selected backend.
    pub fn active_chat_model(&self) -> &str {
        match self.backend {
            ModelBackend::OpenAI => &self.chat_model,
            ModelBackend::Local => &self.local_chat_model,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding model when the local backend is selected.
    pub local_model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            local_model: "nomic-embed-text".to_string(),
            dimensions: 1536,
        }
    }
}

/// Document ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionSettings {
    /// File extensions to ingest (without leading dot).
    pub extensions: Vec<String>,
    /// Target chunk size in characters.
    pub chunk_chars: usize,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap_chars: usize,
    /// Path to the parse cache file.
    pub cache_path: String,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["txt".to_string(), "md".to_string()],
            chunk_chars: 1500,
            chunk_overlap_chars: 200,
            cache_path: "~/.svar/ingest_cache.json".to_string(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.svar/vectors.db".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Maximum number of context chunks to retrieve (top-K).
    pub top_k: u32,
    /// Minimum similarity score (0.0-1.0).
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.3,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }

    /// Get the expanded parse cache path.
    pub fn cache_path(&self) -> PathBuf {
        Self::expand_path(&self.ingestion.cache_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model.backend, ModelBackend::OpenAI);
        assert_eq!(settings.retrieval.top_k, 5);
        assert_eq!(settings.embedding.dimensions, 1536);
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("local".parse::<ModelBackend>().unwrap(), ModelBackend::Local);
        assert_eq!("ollama".parse::<ModelBackend>().unwrap(), ModelBackend::Local);
        assert_eq!("openai".parse::<ModelBackend>().unwrap(), ModelBackend::OpenAI);
        assert!("mystery".parse::<ModelBackend>().is_err());
    }

    #[test]
    fn test_active_chat_model_follows_backend() {
        let mut model = ModelSettings::default();
        assert_eq!(model.active_chat_model(), "gpt-4o-mini");
        model.backend = ModelBackend::Local;
        assert_eq!(model.active_chat_model(), "llama3.1");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [model]
            backend = "local"
            "#,
        )
        .unwrap();
        assert_eq!(settings.model.backend, ModelBackend::Local);
        assert_eq!(settings.model.local_base_url, "http://localhost:11434/v1");
        assert_eq!(settings.retrieval.top_k, 5);
    }
}
