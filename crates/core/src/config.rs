//! Configuration management for the Deskbot assistant.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Environment variables
//! - Command-line flags
//! - Config file (deskbot.yaml)
//!
//! Secrets never live in the file itself: the file names the environment
//! variable that holds each secret (`apiTokenEnv`, `passwordEnv`), and the
//! value is resolved from the process environment at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// This struct holds all global configuration options that affect the
/// assistant's behavior: which LLM to call, where the wiki and relational
/// store live, which tables may be queried, and which content patterns are
/// blocked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider settings
    pub llm: LlmSettings,

    /// Wiki provider settings
    pub wiki: WikiSettings,

    /// Relational store settings
    pub database: DatabaseSettings,

    /// Content-policy settings
    pub policy: PolicySettings,
}

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider identifier (e.g., "ollama")
    pub provider: String,

    /// Optional custom endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model identifier
    pub model: String,

    /// Optional request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(), // Local-first default
            endpoint: None,
            model: "llama3.2".to_string(),
            timeout: None,
        }
    }
}

/// Wiki provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiSettings {
    /// Base URL of the wiki instance
    #[serde(rename = "baseUrl")]
    pub base_url: String,

    /// Username for basic authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Environment variable holding the API token
    #[serde(rename = "apiTokenEnv")]
    pub api_token_env: String,

    /// Maximum number of search results per question
    #[serde(rename = "searchLimit")]
    pub search_limit: usize,

    /// Source label used in answer attribution
    pub label: String,
}

impl Default for WikiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            api_token_env: "DESKBOT_WIKI_TOKEN".to_string(),
            search_limit: 5,
            label: "Confluence".to_string(),
        }
    }
}

impl WikiSettings {
    /// Resolve the API token from the configured environment variable.
    pub fn resolve_api_token(&self) -> Option<String> {
        std::env::var(&self.api_token_env).ok()
    }
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database server host
    pub host: String,

    /// Database server port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Environment variable holding the database password
    #[serde(rename = "passwordEnv")]
    pub password_env: String,

    /// Database name
    pub database: String,

    /// Tables the query translator may reference. Immutable after startup;
    /// an empty list means no database lookups are attempted.
    #[serde(rename = "allowedTables", default)]
    pub allowed_tables: Vec<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "deskbot".to_string(),
            password_env: "DESKBOT_DB_PASSWORD".to_string(),
            database: "deskbot".to_string(),
            allowed_tables: Vec::new(),
        }
    }
}

impl DatabaseSettings {
    /// Build a Postgres connection URL, resolving the password from the
    /// configured environment variable. When the variable is unset the URL
    /// omits the password (host-based auth).
    pub fn connection_url(&self) -> String {
        match std::env::var(&self.password_env) {
            Ok(password) => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, password, self.host, self.port, self.database
            ),
            Err(_) => format!(
                "postgres://{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
        }
    }
}

/// Content-policy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Additional blocked patterns, appended to the built-in set.
    /// Each entry is a regular expression, matched case-insensitively.
    #[serde(rename = "blockedPatterns", default)]
    pub blocked_patterns: Vec<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSettings>,
    wiki: Option<WikiSettings>,
    database: Option<DatabaseSettings>,
    policy: Option<PolicySettings>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: LlmSettings::default(),
            wiki: WikiSettings::default(),
            database: DatabaseSettings::default(),
            policy: PolicySettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a config file, environment variables, and
    /// defaults.
    ///
    /// `config_file` (usually the `--config` flag) takes precedence over the
    /// `DESKBOT_CONFIG` environment variable; with neither, `./deskbot.yaml`
    /// is used when present.
    ///
    /// Environment variables:
    /// - `DESKBOT_CONFIG`: Path to config file
    /// - `DESKBOT_PROVIDER`: LLM provider
    /// - `DESKBOT_MODEL`: Model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.or_else(|| {
            std::env::var("DESKBOT_CONFIG")
                .ok()
                .map(PathBuf::from)
        });

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("deskbot.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            // An explicitly named file that is missing is an operator error;
            // only the implicit default may be absent.
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DESKBOT_PROVIDER") {
            config.llm.provider = provider;
        }

        if let Ok(model) = std::env::var("DESKBOT_MODEL") {
            config.llm.model = model;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            result.llm = llm;
        }

        if let Some(wiki) = config_file.wiki {
            result.wiki = wiki;
        }

        if let Some(database) = config_file.database {
            result.database = database;
        }

        if let Some(policy) = config_file.policy {
            result.policy = policy;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.llm.provider = provider;
        }

        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration before the pipeline is wired up.
    pub fn validate(&self) -> AppResult<()> {
        if self.llm.provider.trim().is_empty() {
            return Err(AppError::Config("LLM provider must not be empty".into()));
        }

        if self.wiki.base_url.trim().is_empty() {
            return Err(AppError::Config(
                "wiki.baseUrl must be set to the wiki instance URL".into(),
            ));
        }

        if self.wiki.search_limit == 0 {
            return Err(AppError::Config(
                "wiki.searchLimit must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
