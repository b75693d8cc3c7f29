//! Prompt builder for rendering the built-in templates.

use std::collections::HashMap;

use deskbot_core::{AppError, AppResult};
use handlebars::Handlebars;

use crate::templates;

/// Build the question-to-SQL translation prompt.
///
/// `allowed_tables` is embedded verbatim as a comma-separated list; an empty
/// list still renders (the guard and executor layers make an empty allowlist
/// harmless, since the translator has nothing valid to reference).
pub fn translation_prompt(question: &str, allowed_tables: &[String]) -> AppResult<String> {
    tracing::debug!(tables = allowed_tables.len(), "Building translation prompt");

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("tables".to_string(), allowed_tables.join(", "));

    render_template(templates::TRANSLATE_QUERY, &variables)
}

/// Build the answer-synthesis prompt from pre-formatted context blocks.
pub fn synthesis_prompt(
    question: &str,
    wiki_context: &str,
    database_context: &str,
) -> AppResult<String> {
    tracing::debug!("Building synthesis prompt");

    let mut variables = HashMap::new();
    variables.insert("question".to_string(), question.to_string());
    variables.insert("wiki_context".to_string(), wiki_context.to_string());
    variables.insert(
        "database_context".to_string(),
        database_context.to_string(),
    );

    render_template(templates::SYNTHESIZE_ANSWER, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
