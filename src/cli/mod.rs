//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - Document Agents and RAG
///
/// A local-first CLI for building a searchable knowledge base from your
/// documents and asking an LLM agent questions over it. The name "Svar"
/// comes from the Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Use the local model backend for this invocation
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest and index documents from a directory
    Ingest {
        /// Directory to ingest recursively
        dir: String,

        /// Force re-processing even if marked done in the parse cache
        #[arg(short, long)]
        force: bool,
    },

    /// Ask a question and get an answer from your documents
    Ask {
        /// The question to ask
        question: String,

        /// Chat model to use for response generation
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of context chunks to include
        #[arg(short = 'c', long, default_value = "5")]
        max_chunks: usize,
    },

    /// Search for relevant document chunks
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Minimum similarity score (0.0-1.0)
        #[arg(short, long, default_value = "0.3")]
        min_score: f32,
    },

    /// Start an interactive chat session
    Chat {
        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run an AI agent to perform a task with tools
    Agent {
        /// The task for the agent to perform (e.g., "Add 101 and 303")
        task: String,

        /// Chat model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Print the raw reasoning trace even on the hosted backend
        #[arg(long)]
        trace: bool,
    },

    /// List indexed documents
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
