//! Configuration module for Svar.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    EmbeddingSettings, GeneralSettings, IngestionSettings, ModelBackend, ModelSettings,
    RetrievalSettings, Settings, VectorStoreSettings,
};
