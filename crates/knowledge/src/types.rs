//! Domain types flowing through the pipeline.

use std::collections::BTreeMap;

use deskbot_core::ContentPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A wiki excerpt that survived the content policy.
///
/// Excerpts are atomic with respect to the policy decision: an excerpt that
/// trips a blocked pattern is excluded entirely, never partially redacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceExcerpt {
    /// Page title
    pub title: String,

    /// Search-result excerpt text
    pub excerpt: String,

    /// Web URL of the page
    pub url: String,
}

/// One database row as a column-name → value mapping.
///
/// Values keep their executor-provided representation; the stringified form
/// is used only for the policy check. Like excerpts, records are atomic: one
/// unsafe field excludes the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Column name → value, in stable (sorted) column order
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Build a record by zipping column names with one row of values.
    pub fn from_row(columns: &[String], values: Vec<Value>) -> Self {
        let fields = columns.iter().cloned().zip(values).collect();
        Self { fields }
    }

    /// Check every field value against the content policy.
    ///
    /// Returns false if the stringified form of any single value is unsafe.
    pub fn is_safe(&self, policy: &ContentPolicy) -> bool {
        self.fields
            .values()
            .all(|value| policy.is_safe(&value_text(value)))
    }
}

/// The text form of a field value, as seen by the content policy.
///
/// Strings are inspected raw (no JSON quoting); other values use their JSON
/// rendering.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A knowledge source that contributed to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The document wiki
    Wiki,
    /// The relational database
    Database,
}

/// The final answer returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedAnswer {
    /// Synthesized answer text, including the attribution suffix when at
    /// least one source contributed
    pub text: String,

    /// Which sources contributed at least one surviving item
    pub sources: Vec<SourceKind>,
}
