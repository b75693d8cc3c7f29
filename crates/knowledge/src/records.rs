//! Database retrieval: translate → gate → execute → per-row filtering.

use std::sync::Arc;

use deskbot_core::ContentPolicy;

use crate::sql::{QueryGuard, QueryTranslator, SqlExecutor};
use crate::types::Record;

/// Orchestrates the guarded database lookup for one question.
///
/// Every fault in this pipeline (translation failure, gate rejection,
/// execution error) is absorbed at this boundary and converted into an
/// empty contribution. A single bad generated query must never take down
/// the service; the structured warn events are what distinguish a failing
/// executor from genuinely empty data.
pub struct RecordSearcher {
    translator: QueryTranslator,
    executor: Arc<dyn SqlExecutor>,
    policy: Arc<ContentPolicy>,
    allowed_tables: Vec<String>,
}

impl RecordSearcher {
    /// Create a searcher over injected translation and execution backends.
    ///
    /// `allowed_tables` is fixed for the process lifetime; an empty list
    /// disables database lookups entirely.
    pub fn new(
        translator: QueryTranslator,
        executor: Arc<dyn SqlExecutor>,
        policy: Arc<ContentPolicy>,
        allowed_tables: Vec<String>,
    ) -> Self {
        Self {
            translator,
            executor,
            policy,
            allowed_tables,
        }
    }

    /// Look up records for a question; never fails.
    pub async fn search(&self, question: &str) -> Vec<Record> {
        if self.allowed_tables.is_empty() {
            tracing::debug!("No tables allowed; skipping database lookup");
            return Vec::new();
        }

        let statement = match self.translator.translate(question, &self.allowed_tables).await {
            Ok(Some(statement)) => statement,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Query translation failed; continuing without database results");
                return Vec::new();
            }
        };

        if !QueryGuard::accepts(&statement) {
            // Already logged by the gate; rejection is "no query", not an error.
            return Vec::new();
        }

        let row_set = match self.executor.fetch_rows(&statement).await {
            Ok(row_set) => row_set,
            Err(e) => {
                tracing::warn!(error = %e, "Query execution failed; continuing without database results");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for values in row_set.rows {
            let record = Record::from_row(&row_set.columns, values);
            if record.is_safe(&self.policy) {
                records.push(record);
            } else {
                tracing::debug!("Dropped database record flagged by content policy");
            }
        }

        tracing::debug!(count = records.len(), "Database search complete");
        records
    }
}
