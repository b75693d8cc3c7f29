//! Sensitive-content policy.
//!
//! `ContentPolicy` is a pure predicate over text, backed by an ordered set of
//! case-insensitive regular expressions. It is applied independently at every
//! pipeline boundary: each wiki excerpt, each stringified database field, and
//! the final synthesized answer. No stage assumes upstream filtering was
//! sufficient.
//!
//! The built-in patterns cover password-like tokens, payment-card references,
//! and SSN/social-security tokens (both the keywords and the number shapes).
//! Operators extend the set through `policy.blockedPatterns` in the config
//! file; no code change is needed to grow the list.

use regex::RegexSetBuilder;

use crate::error::{AppError, AppResult};

/// Built-in blocked patterns, matched case-insensitively.
const BUILTIN_PATTERNS: &[&str] = &[
    // Password-like tokens
    r"password[s]?",
    r"passphrase[s]?",
    // Payment-card references and card-number shapes
    r"credit.?card",
    r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{1,4}\b",
    // SSN / social-security tokens and the SSN number shape
    r"\bssn\b",
    r"social.?security",
    r"\b\d{3}-\d{2}-\d{4}\b",
];

/// Pattern-based detector of sensitive text.
///
/// A single compiled `RegexSet`; `is_safe` returns false as soon as any
/// pattern matches. The policy is immutable after construction and safe for
/// unsynchronized concurrent reads.
#[derive(Debug)]
pub struct ContentPolicy {
    patterns: regex::RegexSet,
    builtin_count: usize,
}

impl ContentPolicy {
    /// Build a policy from the built-in patterns plus operator-supplied
    /// extensions.
    ///
    /// # Errors
    /// Returns `AppError::Policy` if any supplied pattern is not a valid
    /// regular expression. Construction fails fast so a bad pattern is
    /// caught at startup, not silently skipped at filter time.
    pub fn with_extra_patterns(extra: &[String]) -> AppResult<Self> {
        let all: Vec<&str> = BUILTIN_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .collect();

        let patterns = RegexSetBuilder::new(&all)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::Policy(format!("Invalid blocked pattern: {}", e)))?;

        tracing::debug!(
            builtin = BUILTIN_PATTERNS.len(),
            configured = extra.len(),
            "Content policy compiled"
        );

        Ok(Self {
            patterns,
            builtin_count: BUILTIN_PATTERNS.len(),
        })
    }

    /// Check whether text is safe to surface.
    ///
    /// Returns false if any blocked pattern matches anywhere in the text;
    /// true only if no pattern matches. Pure predicate, no side effects.
    pub fn is_safe(&self, text: &str) -> bool {
        !self.patterns.is_match(text)
    }

    /// Total number of active patterns (built-in + configured).
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of patterns contributed by configuration.
    pub fn extra_pattern_count(&self) -> usize {
        self.patterns.len() - self.builtin_count
    }
}
