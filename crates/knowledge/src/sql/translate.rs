//! Natural-language question → SQL statement translation.

use std::sync::Arc;

use deskbot_core::AppResult;
use deskbot_llm::{CompletionRequest, LlmClient};

/// Token budget for a generated statement.
const MAX_QUERY_TOKENS: u32 = 100;

/// Turns a question plus the configured table allowlist into a single
/// candidate SQL statement via the completion model.
///
/// The translator does not judge safety; that is the gate's job. Its only
/// contract is: bounded completion, trimmed, and an empty completion means
/// "no query" rather than an error.
pub struct QueryTranslator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl QueryTranslator {
    /// Create a translator over an injected completion client.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Translate a question into a candidate statement.
    ///
    /// Returns `Ok(None)` when the model produces an empty completion.
    /// Transport or provider errors propagate; the caller absorbs them into
    /// an empty record contribution.
    pub async fn translate(
        &self,
        question: &str,
        allowed_tables: &[String],
    ) -> AppResult<Option<String>> {
        let prompt = deskbot_prompt::translation_prompt(question, allowed_tables)?;

        let request = CompletionRequest::new(prompt, &self.model)
            .with_max_tokens(MAX_QUERY_TOKENS)
            .with_temperature(0.0);

        let response = self.client.complete(&request).await?;
        let statement = response.content.trim();

        if statement.is_empty() {
            tracing::debug!("Translator produced an empty completion");
            return Ok(None);
        }

        tracing::debug!(statement, "Translated question to candidate statement");
        Ok(Some(statement.to_string()))
    }
}
