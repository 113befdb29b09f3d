//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::config::{ModelBackend, Settings};
use crate::error::{Result, SvarError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Ingestion needs embeddings, hence an API key on the hosted backend.
    Ingest,
    /// Asking questions needs model access.
    Ask,
    /// Search needs embeddings for the query.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
/// The local backend needs no API key.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    if settings.model.backend == ModelBackend::Local {
        return Ok(());
    }

    match operation {
        Operation::Ingest | Operation::Ask | Operation::Search => check_api_key(),
    }
}

/// Check if the OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SvarError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SvarError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_backend_skips_api_key_check() {
        let mut settings = Settings::default();
        settings.model.backend = ModelBackend::Local;
        assert!(check(Operation::Ask, &settings).is_ok());
        assert!(check(Operation::Ingest, &settings).is_ok());
    }
}
