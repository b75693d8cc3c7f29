//! Ollama LLM provider implementation.
//!
//! Integration with Ollama, a local LLM runtime.
//! Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use std::time::Duration;

use crate::client::{CompletionRequest, CompletionResponse, LlmClient, TokenUsage};
use deskbot_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Default Ollama endpoint.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama LLM client.
pub struct OllamaClient {
    /// Base URL for the Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client against the default local endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with a custom base URL and a request timeout.
    ///
    /// The timeout bounds the whole HTTP exchange; a slow model past the
    /// deadline surfaces as an `AppError::Llm` like any transport failure.
    pub fn with_settings(base_url: impl Into<String>, timeout_secs: Option<u64>) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn to_ollama_request(&self, request: &CompletionRequest) -> OllamaRequest {
        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stream: false,
        }
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for OllamaClient {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &CompletionRequest) -> AppResult<CompletionResponse> {
        tracing::debug!(model = %request.model, "Sending completion request to Ollama");

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        let usage = TokenUsage::new(
            ollama_response.prompt_eval_count.unwrap_or(0),
            ollama_response.eval_count.unwrap_or(0),
        );

        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Received completion from Ollama"
        );

        Ok(CompletionResponse {
            content: ollama_response.response,
            model: ollama_response.model,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_request_mapping() {
        let client = OllamaClient::new();
        let request = CompletionRequest::new("question", "llama3.2")
            .with_max_tokens(100)
            .with_temperature(0.0);

        let mapped = client.to_ollama_request(&request);
        assert_eq!(mapped.model, "llama3.2");
        assert_eq!(mapped.num_predict, Some(100));
        assert!(!mapped.stream);
    }

    #[tokio::test]
    async fn test_complete_parses_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(serde_json::json!({
                    "model": "llama3.2",
                    "response": "SELECT * FROM employees",
                    "done": true,
                    "prompt_eval_count": 25,
                    "eval_count": 8
                }));
            })
            .await;

        let client = OllamaClient::with_base_url(server.base_url());
        let request = CompletionRequest::new("question", "llama3.2").with_max_tokens(100);
        let response = client.complete(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "SELECT * FROM employees");
        assert_eq!(response.usage.total(), 33);
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("model not loaded");
            })
            .await;

        let client = OllamaClient::with_base_url(server.base_url());
        let request = CompletionRequest::new("question", "llama3.2");
        let result = client.complete(&request).await;

        assert!(matches!(result, Err(deskbot_core::AppError::Llm(_))));
    }
}
