//! Svar - Document Agents and RAG
//!
//! A local-first CLI tool for indexing documents and asking an LLM agent questions over them.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Ingest directories of plain-text and Markdown documents
//! - Build a searchable vector database from their content
//! - Ask questions and get AI-powered answers with citations
//! - Run a tool-calling agent that can search documents and do arithmetic
//! - Swap between a hosted model and a local OpenAI-compatible server
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `loader` - Document discovery and loading
//! - `chunking` - Content chunking strategies
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector database abstraction
//! - `ingest` - Ingestion pipeline and parse cache
//! - `rag` - RAG engine for question answering
//! - `agent` - Tool schemas, tool execution, and the agent loop
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use svar::config::Settings;
//! use svar::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     // Ingest a directory of documents
//!     let result = orchestrator.ingest_directory(Path::new("./docs"), false).await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod vector_store;

pub use error::{Result, SvarError};
