//! Prompt system for the Deskbot assistant.
//!
//! This crate holds the two oracle prompts the pipeline depends on
//! (question-to-SQL translation and answer synthesis) as Handlebars
//! templates, plus the render helpers that fill them. The templates are
//! fixed contracts of the pipeline rather than user-editable documents:
//! the translation wording constrains the model to a single read-only
//! statement, and the synthesis wording constrains it to the supplied
//! context.

pub mod builder;
pub mod templates;

pub use builder::{synthesis_prompt, translation_prompt};
