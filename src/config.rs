//! Configuration management for the Solace companion

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::context::{ContextConfig, SummaryConfig};
use crate::{Error, Result};

/// Companion configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database)
    pub data_dir: PathBuf,

    /// AI service endpoint configuration
    pub ai: AiConfig,

    /// Context-window caps
    pub context: ContextConfig,

    /// Summarizer tuning
    pub summary: SummaryConfig,

    /// Trailing window for conversation summaries, in days
    pub summary_days: u32,
}

/// AI service endpoint configuration
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the chat-completion endpoint
    pub base_url: String,

    /// API key (from `SOLACE_AI_KEY` env)
    pub api_key: Option<String>,

    /// Model identifier for completions
    pub model: String,

    /// Per-request timeout
    pub timeout: Duration,
}

/// On-disk configuration file shape; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    ai_base_url: Option<String>,
    ai_model: Option<String>,
    ai_timeout_secs: Option<u64>,
    max_turns: Option<usize>,
    max_context_items: Option<usize>,
    summary_days: Option<u32>,
    summary_min_turns: Option<usize>,
    summary_max_themes: Option<usize>,
}

impl Config {
    /// Load configuration from the platform config dir, then apply
    /// environment overrides (`SOLACE_*`)
    ///
    /// # Errors
    ///
    /// Returns error if the config file exists but cannot be parsed, or no
    /// data directory can be determined
    pub fn load() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "solace", "solace")
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;

        let file = Self::read_file(&dirs.config_dir().join("config.toml"))?;

        let data_dir = env_var("SOLACE_DATA_DIR")
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(|| dirs.data_dir().to_path_buf());

        let ai = AiConfig {
            base_url: env_var("SOLACE_AI_URL")
                .or(file.ai_base_url)
                .unwrap_or_else(|| "https://api.openai.com".to_string()),
            api_key: env_var("SOLACE_AI_KEY"),
            model: env_var("SOLACE_AI_MODEL")
                .or(file.ai_model)
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(
                env_var("SOLACE_AI_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .or(file.ai_timeout_secs)
                    .unwrap_or(30),
            ),
        };

        let defaults = ContextConfig::default();
        let context = ContextConfig {
            max_turns: env_var("SOLACE_MAX_TURNS")
                .and_then(|v| v.parse().ok())
                .or(file.max_turns)
                .unwrap_or(defaults.max_turns),
            max_context_items: env_var("SOLACE_MAX_CONTEXT_ITEMS")
                .and_then(|v| v.parse().ok())
                .or(file.max_context_items)
                .unwrap_or(defaults.max_context_items),
        };

        let summary_defaults = SummaryConfig::default();
        let summary = SummaryConfig {
            min_turns: file.summary_min_turns.unwrap_or(summary_defaults.min_turns),
            max_themes: file
                .summary_max_themes
                .unwrap_or(summary_defaults.max_themes),
            min_mentions: summary_defaults.min_mentions,
        };

        Ok(Self {
            data_dir,
            ai,
            context,
            summary,
            summary_days: env_var("SOLACE_SUMMARY_DAYS")
                .and_then(|v| v.parse().ok())
                .or(file.summary_days)
                .unwrap_or(7),
        })
    }

    /// Path to the `SQLite` database file
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("solace.db")
    }

    fn read_file(path: &std::path::Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
