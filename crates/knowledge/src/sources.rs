//! Wiki retrieval with per-excerpt policy filtering.

use std::sync::Arc;

use deskbot_core::ContentPolicy;

use crate::types::SourceExcerpt;
use crate::wiki::WikiSearch;

/// Searches the wiki provider and filters every excerpt through the content
/// policy.
///
/// Provider ranking order is preserved; an excerpt that trips the policy is
/// dropped whole. Provider failure is absorbed here: the wiki simply
/// contributes nothing to the answer.
pub struct SourceSearcher {
    wiki: Arc<dyn WikiSearch>,
    policy: Arc<ContentPolicy>,
    limit: usize,
}

impl SourceSearcher {
    /// Create a searcher with a result cap per question.
    pub fn new(wiki: Arc<dyn WikiSearch>, policy: Arc<ContentPolicy>, limit: usize) -> Self {
        Self {
            wiki,
            policy,
            limit,
        }
    }

    /// Search the wiki for a question; never fails, never exceeds the cap.
    pub async fn search(&self, question: &str) -> Vec<SourceExcerpt> {
        let hits = match self.wiki.search(question, self.limit).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "Wiki search failed; continuing without wiki results");
                return Vec::new();
            }
        };

        let mut excerpts = Vec::new();
        // The provider is asked for `limit` results but not trusted to honor it.
        for hit in hits.into_iter().take(self.limit) {
            if self.policy.is_safe(&hit.excerpt) {
                excerpts.push(SourceExcerpt {
                    title: hit.title,
                    excerpt: hit.excerpt,
                    url: hit.url,
                });
            } else {
                tracing::debug!(title = %hit.title, "Dropped wiki excerpt flagged by content policy");
            }
        }

        tracing::debug!(count = excerpts.len(), "Wiki search complete");
        excerpts
    }
}
