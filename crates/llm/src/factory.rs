//! LLM provider factory.
//!
//! Resolves a provider name from configuration into a boxed client. The
//! pipeline components receive the client as an explicit dependency at
//! construction, never through process-wide state.

use std::sync::Arc;

use deskbot_core::{AppError, AppResult};

use crate::client::LlmClient;
use crate::providers::OllamaClient;

/// Create an LLM client for the named provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `timeout_secs` - Optional request timeout in seconds
///
/// # Errors
/// Returns `AppError::Llm` for an unknown provider or a client that fails
/// to initialize.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    timeout_secs: Option<u64>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_settings(url, timeout_secs)?,
                None => match timeout_secs {
                    Some(_) => {
                        OllamaClient::with_settings("http://localhost:11434", timeout_secs)?
                    }
                    None => OllamaClient::new(),
                },
            };
            Ok(Arc::new(client))
        }
        other => Err(AppError::Llm(format!("Unknown LLM provider: {}", other))),
    }
}
