//! Error types for the Deskbot assistant.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application, including configuration, I/O, LLM, wiki, database,
//! policy, and prompt errors.

use thiserror::Error;

/// Unified error type for the Deskbot assistant.
///
/// All fallible functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Wiki provider errors
    #[error("Wiki error: {0}")]
    Wiki(String),

    /// Relational store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Content-policy construction errors (invalid patterns)
    #[error("Policy error: {0}")]
    Policy(String),

    /// Prompt rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
