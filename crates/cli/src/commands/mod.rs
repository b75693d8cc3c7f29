//! Command handlers for the Deskbot CLI.

pub mod ask;
pub mod serve;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use serve::ServeCommand;

use std::sync::Arc;

use deskbot_core::{AppConfig, AppResult, ContentPolicy};
use deskbot_knowledge::{
    AnswerComposer, ConfluenceClient, PostgresExecutor, QueryTranslator, RecordSearcher,
    SourceSearcher, SqlExecutor, WikiSearch,
};

/// Wire the answer pipeline from configuration.
///
/// All external collaborators are constructed here and injected explicitly;
/// nothing below this layer reaches for process-wide state.
pub fn build_composer(config: &AppConfig) -> AppResult<AnswerComposer> {
    config.validate()?;

    let policy = Arc::new(ContentPolicy::with_extra_patterns(
        &config.policy.blocked_patterns,
    )?);
    tracing::debug!(
        patterns = policy.pattern_count(),
        configured = policy.extra_pattern_count(),
        "Content policy loaded"
    );

    let client = deskbot_llm::create_client(
        &config.llm.provider,
        config.llm.endpoint.as_deref(),
        config.llm.timeout,
    )?;

    let wiki: Arc<dyn WikiSearch> = Arc::new(ConfluenceClient::new(
        &config.wiki.base_url,
        config.wiki.username.clone(),
        config.wiki.resolve_api_token(),
    ));
    let sources = SourceSearcher::new(wiki, Arc::clone(&policy), config.wiki.search_limit);

    let executor: Arc<dyn SqlExecutor> =
        Arc::new(PostgresExecutor::new(config.database.connection_url()));
    let records = RecordSearcher::new(
        QueryTranslator::new(Arc::clone(&client), config.llm.model.clone()),
        executor,
        Arc::clone(&policy),
        config.database.allowed_tables.clone(),
    );

    Ok(AnswerComposer::new(
        sources,
        records,
        client,
        config.llm.model.clone(),
        policy,
        config.wiki.label.clone(),
    ))
}
