//! Serve command handler.
//!
//! Reads newline-delimited JSON message events from stdin and writes replies
//! to stdout, standing in for an external chat-platform event loop. Events
//! that carry no question produce no output; malformed lines are logged and
//! skipped.

use clap::Args;
use deskbot_core::{AppConfig, AppResult};
use deskbot_knowledge::{InboundHandler, MessageEvent};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Read message events from stdin and reply on stdout
#[derive(Args, Debug)]
pub struct ServeCommand {}

impl ServeCommand {
    /// Execute the serve loop until stdin closes.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting serve loop");

        let handler = InboundHandler::new(super::build_composer(config)?);

        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event: MessageEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring malformed event");
                    continue;
                }
            };

            if let Some(reply) = handler.handle(&event).await {
                println!("{}", reply);
            }
        }

        tracing::info!("Input closed; serve loop finished");
        Ok(())
    }
}
