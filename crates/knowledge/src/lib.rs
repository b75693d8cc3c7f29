//! Retrieval-and-guardrail pipeline for the Deskbot assistant.
//!
//! A natural-language question is answered from two knowledge sources (a
//! document wiki and a relational database) with a sensitive-content policy
//! applied at every boundary and a read-only gate in front of any generated
//! SQL. The external collaborators (wiki search backend, relational store,
//! text-completion model, chat transport) sit behind traits and are injected
//! at construction.
//!
//! Data flow: question → [`SourceSearcher`] and [`RecordSearcher`]
//! (concurrently) → [`AnswerComposer`] → attributed, policy-checked answer.
//! [`InboundHandler`] adapts chat message events onto the composer.

pub mod answer;
pub mod inbound;
pub mod records;
pub mod sources;
pub mod sql;
pub mod types;
pub mod wiki;

// Re-export commonly used types
pub use answer::AnswerComposer;
pub use inbound::{InboundHandler, MessageEvent, APOLOGY};
pub use records::RecordSearcher;
pub use sources::SourceSearcher;
pub use sql::{PostgresExecutor, QueryGuard, QueryTranslator, RowSet, SqlExecutor};
pub use types::{ComposedAnswer, Record, SourceExcerpt, SourceKind};
pub use wiki::{ConfluenceClient, WikiSearch, WikiSearchHit};
