//! Ask command handler.
//!
//! Answers a single question and prints the attributed reply.

use clap::Args;
use deskbot_core::{AppConfig, AppResult};

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to answer
    pub question: String,

    /// Output the full answer structure as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let composer = super::build_composer(config)?;
        let answer = composer.compose(&self.question).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&answer)?);
        } else {
            println!("{}", answer.text);
        }

        Ok(())
    }
}
