//! Pre-execution gate for generated SQL.

/// Allowlist gate that a translated statement must pass before execution.
///
/// The check is deliberately small and auditable: after leading whitespace,
/// the statement must begin with the single read-only retrieval keyword
/// (`SELECT`, case-insensitive). Everything else, including data
/// modification, DDL, and anything unrecognizable, is rejected and treated
/// as "no query".
///
/// Known limitation: a prefix check does not parse the statement, so it
/// cannot reject injected statement chaining hidden behind a `SELECT`
/// prefix, and it does not cross-check referenced tables against the
/// configured allowlist. Hardening this gate means a real statement parser
/// with a statement-type allowlist and a table cross-check; until then the
/// database role this bot connects as should itself be read-only.
pub struct QueryGuard;

/// The only statement prefix the gate accepts.
const RETRIEVAL_KEYWORD: &str = "select";

impl QueryGuard {
    /// Check whether a statement is acceptable for execution.
    ///
    /// Accepted statements may still be malformed; execution failure handles
    /// those. Rejections are logged for audit.
    pub fn accepts(statement: &str) -> bool {
        let trimmed = statement.trim_start();
        let accepted = trimmed
            .get(..RETRIEVAL_KEYWORD.len())
            .map(|prefix| prefix.eq_ignore_ascii_case(RETRIEVAL_KEYWORD))
            .unwrap_or(false);

        if !accepted {
            tracing::warn!(statement, "Rejected generated statement at the read-only gate");
        }

        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_select_statements() {
        assert!(QueryGuard::accepts("SELECT * FROM employees"));
        assert!(QueryGuard::accepts("select name from departments"));
        assert!(QueryGuard::accepts("  \n\tSeLeCt 1"));
    }

    #[test]
    fn test_accepts_malformed_select_prefixed_text() {
        // A prefix gate only; execution failure handles garbage.
        assert!(QueryGuard::accepts("SELECT FROM FROM"));
    }

    #[test]
    fn test_rejects_data_modification() {
        assert!(!QueryGuard::accepts("DROP TABLE users;"));
        assert!(!QueryGuard::accepts("DELETE FROM employees"));
        assert!(!QueryGuard::accepts("UPDATE salaries SET amount = 0"));
        assert!(!QueryGuard::accepts("INSERT INTO logs VALUES (1)"));
    }

    #[test]
    fn test_rejects_non_statements() {
        assert!(!QueryGuard::accepts(""));
        assert!(!QueryGuard::accepts("   "));
        assert!(!QueryGuard::accepts("I cannot answer that question."));
        assert!(!QueryGuard::accepts("```sql\nSELECT 1\n```"));
    }
}
