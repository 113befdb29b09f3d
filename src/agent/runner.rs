//! Agent runner with tool calling loop.

use super::observer::ToolObserver;
use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::{ModelBackend, Settings};
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::debug;

/// Default system prompt for the agent.
const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an intelligent assistant with access to a document knowledge base and a calculator.

Think step-by-step about what information you need, then use the appropriate tools.

Guidelines:
- Use 'add' for arithmetic instead of computing sums yourself
- Use 'list_documents' first if you need to know what content is available
- Use 'search_documents' to find specific topics across all documents

When you have gathered enough information, provide your final response.
Always cite your sources with document titles when relevant."#;

/// Agent that can use tools to satisfy a natural-language task.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    tools: ToolContext,
    observers: Vec<Arc<dyn ToolObserver>>,
    max_iterations: usize,
    system_prompt: String,
    capture_trace: bool,
}

impl Agent {
    /// Create a new agent for the configured backend.
    ///
    /// With the local backend, a raw trace of reasoning steps and discovered
    /// tool calls is captured alongside the final answer.
    pub fn new(settings: &Settings, tools: ToolContext) -> Self {
        Self {
            client: create_client(&settings.model),
            model: settings.model.active_chat_model().to_string(),
            tools,
            observers: Vec::new(),
            max_iterations: settings.model.max_agent_iterations,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            capture_trace: settings.model.backend == ModelBackend::Local,
        }
    }

    /// Override the chat model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    /// Set maximum iterations for the agent loop.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Subscribe an observer to tool invocation and result events.
    pub fn with_observer(mut self, observer: Arc<dyn ToolObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Override raw trace capture.
    pub fn with_trace(mut self, capture: bool) -> Self {
        self.capture_trace = capture;
        self
    }

    /// Run the agent with a user task.
    pub async fn run(&self, task: &str, context: Option<&str>) -> Result<AgentResponse> {
        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_prompt.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
        ];

        // Build user message with optional context
        let user_message = match context {
            Some(ctx) => format!("Context: {}\n\nTask: {}", ctx, task),
            None => task.to_string(),
        };

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?
                .into(),
        );

        let definitions = tool_definitions()?;
        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();
        let mut trace: Vec<String> = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(SvarError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(messages.clone())
                .tools(definitions.clone())
                .build()
                .map_err(|e| SvarError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| SvarError::ModelApi(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| SvarError::Agent("No response from model".to_string()))?;

            // Check if the model wants to call tools
            if let Some(ref tool_calls) = choice.message.tool_calls {
                if tool_calls.is_empty() {
                    trace.push(format!("step {}: final answer", iterations));
                    return self.build_response(
                        &choice.message.content,
                        tool_calls_made,
                        iterations,
                        trace,
                    );
                }

                trace.push(format!(
                    "step {}: model requested {} tool call(s)",
                    iterations,
                    tool_calls.len()
                ));

                // Add assistant message with tool calls to history
                let assistant_msg = ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| SvarError::Agent(e.to_string()))?;
                messages.push(assistant_msg.into());

                // Execute each tool call
                for tool_call in tool_calls {
                    let record = self.execute_tool_call(tool_call).await;

                    trace.push(format!(
                        "  tool {}({}) -> {} chars",
                        record.name,
                        record.arguments,
                        record.result.len()
                    ));

                    // Add tool result to messages
                    let tool_msg = ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| SvarError::Agent(e.to_string()))?;
                    messages.push(tool_msg.into());

                    tool_calls_made.push(record);
                }
            } else {
                trace.push(format!("step {}: final answer", iterations));
                return self.build_response(
                    &choice.message.content,
                    tool_calls_made,
                    iterations,
                    trace,
                );
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        for observer in &self.observers {
            observer.on_tool_call(name, arguments);
        }

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        for observer in &self.observers {
            observer.on_tool_result(name, &result);
        }

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }

    /// Build the final agent response.
    fn build_response(
        &self,
        content: &Option<String>,
        tool_calls: Vec<ToolCallRecord>,
        iterations: usize,
        trace: Vec<String>,
    ) -> Result<AgentResponse> {
        let content = content.clone().unwrap_or_default();

        Ok(AgentResponse {
            content,
            tool_calls,
            iterations,
            raw_trace: self.capture_trace.then(|| trace.join("\n")),
        })
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (model calls) used.
    pub iterations: usize,
    /// Raw reasoning trace (local backend only).
    pub raw_trace: Option<String>,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_record_display() {
        let record = ToolCallRecord {
            name: "add".to_string(),
            arguments: r#"{"a": 101, "b": 303}"#.to_string(),
            result: "404".to_string(),
        };
        assert_eq!(format!("{}", record), r#"add({"a": 101, "b": 303})"#);
    }
}
