//! Ingest command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(dir: &str, force: bool, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ingest, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let dir = Settings::expand_path(dir);
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner(&format!("Ingesting {}...", dir.display()));

    match orchestrator.ingest_directory(&dir, force).await {
        Ok(result) => {
            spinner.finish_and_clear();
            Output::success(&format!(
                "Ingested {} file(s), {} chunk(s) indexed",
                result.files_processed, result.chunks_indexed
            ));
            if result.files_skipped > 0 {
                Output::info(&format!(
                    "{} file(s) skipped (already in parse cache; use --force to re-ingest)",
                    result.files_skipped
                ));
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Ingestion failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
