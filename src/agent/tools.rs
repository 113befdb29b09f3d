//! Tool definitions and implementations for the agent system.

use super::schema::{ParamSpec, ParamType, ToolSpec};
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use crate::vector_store::VectorStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Available tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Add two numbers.
    Add { a: f64, b: f64 },

    /// Search the document knowledge base.
    SearchDocuments {
        query: String,
        #[serde(default = "default_limit")]
        limit: u32,
    },

    /// List all indexed documents.
    ListDocuments,
}

fn default_limit() -> u32 {
    5
}

/// Tool execution context with access to vector store and embedder.
pub struct ToolContext {
    pub vector_store: Arc<dyn VectorStore>,
    pub embedder: Arc<dyn Embedder>,
    min_score: f32,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(vector_store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            vector_store,
            embedder,
            min_score: 0.3,
        }
    }

    /// Set the minimum similarity score for retrieval.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::Add { a, b } => Ok(format_number(a + b)),
            ToolCall::SearchDocuments { query, limit } => {
                self.execute_search(query, *limit).await
            }
            ToolCall::ListDocuments => self.execute_list_documents().await,
        }
    }

    async fn execute_search(&self, query: &str, limit: u32) -> Result<String> {
        let embedding = self.embedder.embed(query).await?;
        let results = self
            .vector_store
            .search_with_threshold(&embedding, limit as usize, self.min_score)
            .await?;

        if results.is_empty() {
            return Ok("No relevant results found.".to_string());
        }

        let formatted = results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "{}. [{}] {}\n   {}",
                    i + 1,
                    r.document.source_id,
                    r.document.source_title,
                    r.document.content.chars().take(500).collect::<String>()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(format!("Found {} results:\n\n{}", results.len(), formatted))
    }

    async fn execute_list_documents(&self) -> Result<String> {
        let sources = self.vector_store.list_sources().await?;

        if sources.is_empty() {
            return Ok("No documents indexed yet.".to_string());
        }

        let formatted = sources
            .iter()
            .map(|s| {
                format!(
                    "- {} (path: {}, {} chunks)",
                    s.source_title, s.source_id, s.chunk_count
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!("Indexed documents ({}):\n\n{}", sources.len(), formatted))
    }
}

/// Coerce a numeric tool result to text, dropping an integral fraction.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Descriptors for every tool the agent is constructed with.
pub fn tool_specs() -> Result<Vec<ToolSpec>> {
    Ok(vec![
        ToolSpec::new(
            "add",
            "Add two numbers and return their sum. \
             Use this whenever the user asks for arithmetic.",
            vec![
                ParamSpec::new("a", ParamType::Number, "First addend"),
                ParamSpec::new("b", ParamType::Number, "Second addend"),
            ],
            vec!["a".to_string(), "b".to_string()],
        )?,
        ToolSpec::new(
            "search_documents",
            "Search the document knowledge base for relevant content. \
             Use this when you need to find specific information across all documents.",
            vec![
                ParamSpec::new("query", ParamType::String, "The search query"),
                ParamSpec::new(
                    "limit",
                    ParamType::Integer,
                    "Maximum number of results (default: 5)",
                ),
            ],
            vec!["query".to_string()],
        )?,
        ToolSpec::new(
            "list_documents",
            "List all indexed documents in the knowledge base. \
             Use this to see what content is available.",
            vec![],
            vec![],
        )?,
    ])
}

/// Get chat-completions tool definitions for the agent.
pub fn tool_definitions() -> Result<Vec<async_openai::types::ChatCompletionTool>> {
    Ok(tool_specs()?.iter().map(ToolSpec::to_chat_tool).collect())
}

/// Parse a tool call from the chat-completions response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| SvarError::Agent(format!("Invalid tool arguments: {}", e)))?;

    match name {
        "add" => {
            let a = args["a"]
                .as_f64()
                .ok_or_else(|| SvarError::Agent("Missing 'a' argument".to_string()))?;
            let b = args["b"]
                .as_f64()
                .ok_or_else(|| SvarError::Agent("Missing 'b' argument".to_string()))?;
            Ok(ToolCall::Add { a, b })
        }
        "search_documents" => {
            let query = args["query"]
                .as_str()
                .ok_or_else(|| SvarError::Agent("Missing 'query' argument".to_string()))?
                .to_string();
            let limit = args["limit"].as_u64().unwrap_or(5) as u32;
            Ok(ToolCall::SearchDocuments { query, limit })
        }
        "list_documents" => Ok(ToolCall::ListDocuments),
        _ => Err(SvarError::Agent(format!("Unknown tool: {}", name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::vector_store::MemoryVectorStore;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    fn context() -> ToolContext {
        ToolContext::new(Arc::new(MemoryVectorStore::new()), Arc::new(FixedEmbedder))
    }

    #[tokio::test]
    async fn test_add_integral_sum_has_no_fraction() {
        let result = context()
            .execute(&ToolCall::Add { a: 101.0, b: 303.0 })
            .await
            .unwrap();
        assert_eq!(result, "404");
    }

    #[tokio::test]
    async fn test_add_fractional_sum_keeps_fraction() {
        let result = context()
            .execute(&ToolCall::Add { a: 3200.0, b: 2012.5 })
            .await
            .unwrap();
        assert_eq!(result, "5212.5");
    }

    #[tokio::test]
    async fn test_list_documents_empty_store() {
        let result = context().execute(&ToolCall::ListDocuments).await.unwrap();
        assert_eq!(result, "No documents indexed yet.");
    }

    #[tokio::test]
    async fn test_search_documents_formats_hits() {
        let store = Arc::new(MemoryVectorStore::new());
        let doc = crate::vector_store::Document::new(
            "guide.md".to_string(),
            "guide".to_string(),
            "How to configure the thing".to_string(),
            vec![1.0, 0.0, 0.0],
            0,
        );
        store.upsert(&doc).await.unwrap();

        let ctx = ToolContext::new(store, Arc::new(FixedEmbedder));
        let result = ctx
            .execute(&ToolCall::SearchDocuments {
                query: "configure".to_string(),
                limit: 5,
            })
            .await
            .unwrap();

        assert!(result.starts_with("Found 1 results:"));
        assert!(result.contains("[guide.md] guide"));
    }

    #[test]
    fn test_parse_add_tool() {
        let tool = parse_tool_call("add", r#"{"a": 101, "b": 303}"#).unwrap();
        match tool {
            ToolCall::Add { a, b } => {
                assert_eq!(a, 101.0);
                assert_eq!(b, 303.0);
            }
            _ => panic!("Expected Add tool"),
        }
    }

    #[test]
    fn test_parse_search_tool_default_limit() {
        let tool = parse_tool_call("search_documents", r#"{"query": "authentication"}"#).unwrap();
        match tool {
            ToolCall::SearchDocuments { query, limit } => {
                assert_eq!(query, "authentication");
                assert_eq!(limit, 5);
            }
            _ => panic!("Expected SearchDocuments tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool_rejected() {
        assert!(parse_tool_call("launch_missiles", "{}").is_err());
    }

    #[test]
    fn test_tool_specs_validate() {
        let specs = tool_specs().unwrap();
        assert_eq!(specs.len(), 3);
        let names: Vec<&str> = specs.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["add", "search_documents", "list_documents"]);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(404.0), "404");
        assert_eq!(format_number(5212.5), "5212.5");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.0), "0");
    }
}
