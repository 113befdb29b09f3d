//! Model API client configuration with sensible defaults.
//!
//! Both the hosted OpenAI API and local servers such as Ollama speak the
//! same chat-completions protocol, so a single client type serves both
//! backends; the local one just points at a different base URL.

use crate::config::{ModelBackend, ModelSettings};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for model API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Placeholder API key for local endpoints that ignore authentication.
const LOCAL_API_KEY: &str = "local";

/// Create a client for the configured backend.
pub fn create_client(model: &ModelSettings) -> Client<OpenAIConfig> {
    create_client_with_timeout(model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client for the configured backend with a custom timeout.
pub fn create_client_with_timeout(
    model: &ModelSettings,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let config = match model.backend {
        ModelBackend::OpenAI => OpenAIConfig::default(),
        ModelBackend::Local => {
            let base_url = std::env::var("SVAR_LOCAL_BASE_URL")
                .unwrap_or_else(|_| model.local_base_url.clone());
            OpenAIConfig::new()
                .with_api_base(base_url.trim_end_matches('/'))
                .with_api_key(LOCAL_API_KEY)
        }
    };

    Client::with_config(config).with_http_client(http_client)
}
