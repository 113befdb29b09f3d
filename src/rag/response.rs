//! RAG response generation.

use super::{context::format_context_for_prompt, ContextBuilder, ContextChunk};
use crate::config::Settings;
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use crate::vector_store::VectorStore;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

const RAG_SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions using the \
provided document excerpts. Base your answer only on the excerpts; if they do not contain the \
answer, say so. Cite source titles when relevant.";

const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant for exploring a document \
collection. Answer using the context provided with each question, cite source titles when \
relevant, and remember earlier turns of the conversation.";

/// RAG engine for question answering.
pub struct RagEngine {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    context_builder: ContextBuilder,
    conversation_history: Vec<ChatCompletionRequestMessage>,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(
        settings: &Settings,
        vector_store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        model: &str,
        max_context_chunks: usize,
    ) -> Self {
        let context_builder = ContextBuilder::new(vector_store, embedder)
            .with_max_chunks(max_context_chunks)
            .with_min_score(settings.retrieval.min_score);

        Self {
            client: create_client(&settings.model),
            model: model.to_string(),
            context_builder,
            conversation_history: Vec::new(),
        }
    }

    /// Ask a single question and get a response.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        // Build context from the knowledge base
        let context_chunks = self.context_builder.build(question).await?;

        if context_chunks.is_empty() {
            return Ok(RagResponse {
                answer: "I couldn't find any relevant information in your documents for this question.".to_string(),
                sources: Vec::new(),
            });
        }

        let user_prompt = format!(
            "Question: {}\n\nRelevant excerpts:\n{}",
            question,
            format_context_for_prompt(&context_chunks)
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(RAG_SYSTEM_PROMPT)
                .build()
                .map_err(|e| SvarError::Rag(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| SvarError::Rag(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| SvarError::Rag(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            SvarError::ModelApi(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Rag("Empty response from model".to_string()))?
            .clone();

        debug!("Generated response with {} sources", context_chunks.len());

        Ok(RagResponse {
            answer,
            sources: context_chunks,
        })
    }

    /// Start or continue a chat session.
    #[instrument(skip(self), fields(message = %message))]
    pub async fn chat(&mut self, message: &str) -> Result<RagResponse> {
        info!("Chat message: {}", message);

        let context_chunks = self.context_builder.build(message).await?;

        let user_content = if context_chunks.is_empty() {
            format!(
                "Question: {}\n\n(No relevant context found in the document collection)",
                message
            )
        } else {
            format!(
                "Question: {}\n\nRelevant excerpts:\n{}",
                message,
                format_context_for_prompt(&context_chunks)
            )
        };

        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(user_content)
            .build()
            .map_err(|e| SvarError::Rag(e.to_string()))?;

        self.conversation_history.push(user_message.into());

        let mut messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(CHAT_SYSTEM_PROMPT)
                .build()
                .map_err(|e| SvarError::Rag(e.to_string()))?
                .into(),
        ];
        messages.extend(self.conversation_history.clone());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| SvarError::Rag(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            SvarError::ModelApi(format!("Failed to generate response: {}", e))
        })?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::Rag("Empty response from model".to_string()))?
            .clone();

        let assistant_message = ChatCompletionRequestAssistantMessageArgs::default()
            .content(answer.clone())
            .build()
            .map_err(|e| SvarError::Rag(e.to_string()))?;
        self.conversation_history.push(assistant_message.into());

        // Trim history if too long
        if self.conversation_history.len() > 20 {
            self.conversation_history =
                self.conversation_history[self.conversation_history.len() - 20..].to_vec();
        }

        Ok(RagResponse {
            answer,
            sources: context_chunks,
        })
    }

    /// Clear conversation history.
    pub fn clear_history(&mut self) {
        self.conversation_history.clear();
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<ContextChunk>,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n{} ({}) score: {:.2}",
                    source.source_title, source.source_id, source.score
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_for_display_includes_sources() {
        let response = RagResponse {
            answer: "The answer.".to_string(),
            sources: vec![ContextChunk {
                source_id: "notes.md".to_string(),
                source_title: "notes".to_string(),
                content: "ctx".to_string(),
                score: 0.72,
            }],
        };

        let display = response.format_for_display();
        assert!(display.starts_with("The answer."));
        assert!(display.contains("--- Sources ---"));
        assert!(display.contains("notes (notes.md) score: 0.72"));
    }

    #[test]
    fn test_format_for_display_without_sources() {
        let response = RagResponse {
            answer: "No idea.".to_string(),
            sources: Vec::new(),
        };
        assert_eq!(response.format_for_display(), "No idea.");
    }
}
