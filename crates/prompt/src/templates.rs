//! Built-in prompt templates.

/// Template instructing the model to translate a question into a single
/// read-only SQL statement over an explicit table list.
///
/// The instruction is a constraint request, not a guarantee; the generated
/// statement is still validated before execution.
pub const TRANSLATE_QUERY: &str = "\
Convert this question to a safe SQL query that only uses SELECT statements \
and the following tables: {{tables}}
Question: {{question}}
SQL:";

/// Template for synthesizing one answer from both retrieval sources.
pub const SYNTHESIZE_ANSWER: &str = "\
Information from the wiki:
{{wiki_context}}

Information from the database:
{{database_context}}

Based on the above information, please provide a helpful and accurate response.
Question: {{question}}
Answer:";
