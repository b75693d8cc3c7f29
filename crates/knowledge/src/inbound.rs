//! Thin adapter from chat message events onto the composer.
//!
//! The chat transport itself (socket handling, retries, threading) is an
//! external collaborator; this module only decides which events carry a
//! question and guarantees that nothing internal leaks into a reply.

use serde::{Deserialize, Serialize};

use crate::answer::AnswerComposer;

/// Fixed user-visible failure text. Raw errors, statements, and stack
/// traces never reach the reply channel.
pub const APOLOGY: &str = "I apologize, but I encountered an error processing your request. \
Please try again or rephrase your question.";

/// An inbound chat message event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Event type ("app_mention" or "message")
    #[serde(rename = "type")]
    pub event_type: String,

    /// Raw message text
    #[serde(default)]
    pub text: String,

    /// Channel type ("im" for direct messages)
    #[serde(default)]
    pub channel_type: Option<String>,

    /// Channel the event arrived on
    #[serde(default)]
    pub channel: Option<String>,

    /// Sender identifier
    #[serde(default)]
    pub user: Option<String>,
}

/// Handles inbound events: extract the question, compose, reply.
pub struct InboundHandler {
    composer: AnswerComposer,
}

impl InboundHandler {
    /// Create a handler over a composer.
    pub fn new(composer: AnswerComposer) -> Self {
        Self { composer }
    }

    /// Handle one event.
    ///
    /// Returns `None` for events that carry no question (non-DM channel
    /// chatter, unknown event types); those are ignored, not answered.
    /// Any failure while answering yields the generic apology.
    pub async fn handle(&self, event: &MessageEvent) -> Option<String> {
        let question = match event.event_type.as_str() {
            "app_mention" => match extract_mention_question(&event.text) {
                Some(question) => question,
                None => {
                    tracing::warn!("Mention event without an extractable question");
                    return Some(APOLOGY.to_string());
                }
            },
            "message" if event.channel_type.as_deref() == Some("im") => {
                event.text.trim().to_string()
            }
            _ => return None,
        };

        tracing::info!(user = ?event.user, "Handling inbound question");

        match self.composer.compose(&question).await {
            Ok(answer) => Some(answer.text),
            Err(e) => {
                tracing::error!(error = %e, "Failed to compose answer");
                Some(APOLOGY.to_string())
            }
        }
    }
}

/// Question text of a mention event: everything after the `>` that closes
/// the mention marker.
fn extract_mention_question(text: &str) -> Option<String> {
    text.split_once('>')
        .map(|(_, rest)| rest.trim().to_string())
}
