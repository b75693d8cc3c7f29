//! Answer composition: fan-out retrieval, synthesis, attribution.

use std::sync::Arc;

use deskbot_core::{AppResult, ContentPolicy};
use deskbot_llm::{CompletionRequest, LlmClient};

use crate::records::RecordSearcher;
use crate::sources::SourceSearcher;
use crate::types::{value_text, ComposedAnswer, Record, SourceExcerpt, SourceKind};

/// Token budget for the synthesized answer.
const MAX_ANSWER_TOKENS: u32 = 500;

/// Attribution label for the relational database.
const DATABASE_LABEL: &str = "internal database";

/// Substituted when the synthesized answer itself trips the content policy.
///
/// Individual fragments are pre-filtered, but the model can still echo a
/// sensitive shape from the question or recombine safe fragments into an
/// unsafe one, so the final text gets its own pass.
pub const REFUSAL: &str =
    "I found some information, but it includes content I'm not able to share.";

/// Merges both retrieval sources into one attributed answer.
pub struct AnswerComposer {
    sources: SourceSearcher,
    records: RecordSearcher,
    client: Arc<dyn LlmClient>,
    model: String,
    policy: Arc<ContentPolicy>,
    wiki_label: String,
}

impl AnswerComposer {
    /// Create a composer over the two searchers and the synthesis client.
    ///
    /// `wiki_label` is the attribution name for the wiki source (the
    /// database label is fixed).
    pub fn new(
        sources: SourceSearcher,
        records: RecordSearcher,
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        policy: Arc<ContentPolicy>,
        wiki_label: impl Into<String>,
    ) -> Self {
        Self {
            sources,
            records,
            client,
            model: model.into(),
            policy,
            wiki_label: wiki_label.into(),
        }
    }

    /// Compose an answer for one question.
    ///
    /// The two lookups run concurrently and independently; either one
    /// contributing nothing never blocks the other. Synthesis failure is the
    /// one error that propagates; the outermost boundary turns it into the
    /// generic apology.
    pub async fn compose(&self, question: &str) -> AppResult<ComposedAnswer> {
        let (excerpts, records) =
            tokio::join!(self.sources.search(question), self.records.search(question));

        tracing::debug!(
            wiki_count = excerpts.len(),
            record_count = records.len(),
            "Retrieval complete; synthesizing answer"
        );

        let prompt = deskbot_prompt::synthesis_prompt(
            question,
            &format_excerpts(&excerpts),
            &format_records(&records),
        )?;

        let request = CompletionRequest::new(prompt, &self.model)
            .with_max_tokens(MAX_ANSWER_TOKENS)
            .with_temperature(0.3);

        let response = self.client.complete(&request).await?;
        let answer = response.content.trim().to_string();

        // Final pass: the synthesized text is checked like any other content.
        if !self.policy.is_safe(&answer) {
            tracing::warn!("Synthesized answer flagged by content policy; substituting refusal");
            return Ok(ComposedAnswer {
                text: REFUSAL.to_string(),
                sources: Vec::new(),
            });
        }

        let mut sources = Vec::new();
        if !excerpts.is_empty() {
            sources.push(SourceKind::Wiki);
        }
        if !records.is_empty() {
            sources.push(SourceKind::Database);
        }

        let text = match attribution_suffix(&self.wiki_label, &sources) {
            Some(suffix) => format!("{}\n\n{}", answer, suffix),
            None => answer,
        };

        Ok(ComposedAnswer { text, sources })
    }
}

/// Render wiki excerpts as a context block for the synthesis prompt.
fn format_excerpts(excerpts: &[SourceExcerpt]) -> String {
    if excerpts.is_empty() {
        return "(no results)".to_string();
    }

    excerpts
        .iter()
        .map(|excerpt| format!("- {}: {} ({})", excerpt.title, excerpt.excerpt, excerpt.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render database records as a context block for the synthesis prompt.
fn format_records(records: &[Record]) -> String {
    if records.is_empty() {
        return "(no results)".to_string();
    }

    records
        .iter()
        .map(|record| {
            let fields = record
                .fields
                .iter()
                .map(|(column, value)| format!("{}: {}", column, value_text(value)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}", fields)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deterministic attribution line for the contributing sources.
fn attribution_suffix(wiki_label: &str, sources: &[SourceKind]) -> Option<String> {
    let labels: Vec<&str> = sources
        .iter()
        .map(|kind| match kind {
            SourceKind::Wiki => wiki_label,
            SourceKind::Database => DATABASE_LABEL,
        })
        .collect();

    if labels.is_empty() {
        None
    } else {
        Some(format!("Sources: {}", labels.join(" and ")))
    }
}
