//! Agent system for intelligent task execution with tool calling.
//!
//! Provides an LLM agent that can use tools (arithmetic, document
//! retrieval) to satisfy a natural-language task, plus the tool descriptor
//! types and observation hooks the agent is wired with.

mod observer;
mod runner;
mod schema;
mod tools;

pub use observer::{ConsoleObserver, ToolObserver, TracingObserver};
pub use runner::{Agent, AgentResponse, ToolCallRecord};
pub use schema::{ParamSpec, ParamType, ToolSpec};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
