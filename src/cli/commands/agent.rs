//! Agent command implementation.

use crate::agent::{Agent, ConsoleObserver, ToolContext, TracingObserver};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::sync::Arc;

/// Run the agent command.
pub async fn run_agent(
    task: &str,
    model: Option<String>,
    trace: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(settings.clone())?;

    let tool_context = ToolContext::new(orchestrator.vector_store(), orchestrator.embedder())
        .with_min_score(settings.retrieval.min_score);

    let mut agent = Agent::new(&settings, tool_context)
        .with_observer(Arc::new(TracingObserver))
        .with_observer(Arc::new(ConsoleObserver));

    if let Some(model) = model {
        agent = agent.with_model(&model);
    }
    if trace {
        agent = agent.with_trace(true);
    }

    match agent.run(task, None).await {
        Ok(response) => {
            // Show the agent's response
            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::info(&format!("  {}", call));
                }
                println!();
            }

            if let Some(raw_trace) = &response.raw_trace {
                Output::header("Raw trace");
                println!("{}\n", raw_trace);
            }

            Output::info(&format!(
                "Completed in {} iteration(s)",
                response.iterations
            ));
        }
        Err(e) => {
            Output::error(&format!("Agent failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
