//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Plugin registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PluginError {
    #[error("Plugin '{0}' already registered")]
    Duplicate(String),

    #[error("Plugin name '{0}' is reserved")]
    Reserved(String),

    #[error("Plugin name '{0}' must be a single lowercase word")]
    InvalidName(String),
}

/// Message history errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History worker is no longer running")]
    Closed,
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
