//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::bot::DEFAULT_SOURCE_URL;
use crate::application::errors::ConfigError;
use crate::application::services::filter::DEFAULT_MAX_EXPANSIONS;
use crate::application::services::history::DEFAULT_CAPACITY;
use crate::plugins::responder::ResponderRule;

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub variables: VariablesConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
    #[serde(default)]
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub nick: String,
    pub prefix: String,
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct HistoryConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VariablesConfig {
    /// SQLite file; variables live in memory when unset
    pub database: Option<PathBuf>,
    pub max_expansions: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResponderConfig {
    #[serde(default)]
    pub rules: Vec<ResponderRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub channel: String,
    pub user: String,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for VariablesConfig {
    fn default() -> Self {
        Self {
            database: None,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl Default for AdaptersConfig {
    fn default() -> Self {
        Self {
            console: ConsoleConfig {
                enabled: true,
                channel: "#console".to_string(),
                user: "you".to_string(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                nick: "whisker".to_string(),
                prefix: "!".to_string(),
                source_url: default_source_url(),
            },
            history: HistoryConfig::default(),
            variables: VariablesConfig {
                database: Some(PathBuf::from("whisker-bot.db")),
                max_expansions: DEFAULT_MAX_EXPANSIONS,
            },
            responder: ResponderConfig {
                rules: vec![
                    ResponderRule::new("good morning", "Good morning, $who! Have $digit $snack."),
                    ResponderRule::new("who wants", "$someone does, obviously."),
                ],
            },
            adapters: AdaptersConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.nick.trim().is_empty() {
            return Err(ConfigError::MissingField("bot.nick".to_string()));
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if self.responder.rules.iter().any(|r| r.trigger.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(
                "responder rules need a non-empty trigger".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();

        if let Ok(nick) = std::env::var("BOT_NICK") {
            config.bot.nick = nick;
        }

        if let Ok(prefix) = std::env::var("BOT_PREFIX") {
            config.bot.prefix = prefix;
        }

        if let Ok(db) = std::env::var("BOT_VARIABLES_DB") {
            config.variables.database = Some(PathBuf::from(db));
        }

        config
    }
}
