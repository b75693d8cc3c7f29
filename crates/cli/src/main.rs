//! Deskbot CLI
//!
//! Main entry point for the deskbot knowledge assistant. Provides a one-shot
//! `ask` command and a `serve` loop that reads chat message events from
//! stdin.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use deskbot_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Deskbot - guarded knowledge assistant over a wiki and a database
#[derive(Parser, Debug)]
#[command(name = "deskbot")]
#[command(about = "Guarded knowledge assistant over a wiki and a database", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file (default: ./deskbot.yaml)
    #[arg(short, long, global = true, env = "DESKBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (e.g., ollama)
    #[arg(short, long, global = true, env = "DESKBOT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "DESKBOT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question and print the reply
    Ask(AskCommand),

    /// Read message events from stdin and reply on stdout
    Serve(ServeCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = AppConfig::load(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Deskbot starting");
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Serve(_) => "serve",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
