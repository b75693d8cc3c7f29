//! Deskbot Core Library
//!
//! This crate provides the foundational utilities for the Deskbot assistant:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The sensitive-content policy applied at every pipeline boundary

pub mod config;
pub mod error;
pub mod logging;
pub mod policy;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use policy::ContentPolicy;
