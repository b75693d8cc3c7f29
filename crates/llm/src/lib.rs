//! LLM integration crate for the Deskbot assistant.
//!
//! This crate provides a provider-agnostic abstraction for text completion.
//! The pipeline treats the model as a stateless oracle: every call is a
//! single bounded-length completion with no conversation memory.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//!
//! # Example
//! ```no_run
//! use deskbot_llm::{CompletionRequest, LlmClient, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = CompletionRequest::new("Hello, world!", "llama3.2").with_max_tokens(64);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{CompletionRequest, CompletionResponse, LlmClient, TokenUsage};
pub use factory::create_client;
pub use providers::OllamaClient;
