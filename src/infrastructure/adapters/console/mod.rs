//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::application::errors::BotError;
use crate::domain::traits::Transport;

/// One line the bot sent out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub channel: String,
    pub text: String,
    pub action: bool,
}

/// Console transport for local development
///
/// Prints outgoing lines to stdout. Lines are only kept in memory once
/// `recording()` or `quiet()` is set, so a long-running console bot does not
/// accumulate its whole output.
#[derive(Clone)]
pub struct ConsoleAdapter {
    nick: String,
    echo: bool,
    record: bool,
    sent: Arc<Mutex<Vec<Outgoing>>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            nick: "whisker".to_string(),
            echo: true,
            record: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = nick.into();
        self
    }

    /// Keep a copy of every outgoing line for `sent()`
    pub fn recording(mut self) -> Self {
        self.record = true;
        self
    }

    /// Record outgoing lines without printing them
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self.recording()
    }

    /// Everything recorded so far, oldest first
    pub fn sent(&self) -> Vec<Outgoing> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, channel: &str, text: &str, action: bool) -> Result<(), BotError> {
        if self.echo {
            if action {
                println!("[{}] * {} {}", channel, self.nick, text);
            } else {
                println!("[{}] <{}> {}", channel, self.nick, text);
            }
        }

        if !self.record {
            return Ok(());
        }

        self.sent
            .lock()
            .map_err(|_| BotError::Transport("Lock poisoned".to_string()))?
            .push(Outgoing {
                channel: channel.to_string(),
                text: text.to_string(),
                action,
            });
        Ok(())
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, channel: &str, text: &str) -> Result<(), BotError> {
        self.record(channel, text, false)
    }

    async fn send_action(&self, channel: &str, text: &str) -> Result<(), BotError> {
        self.record(channel, text, true)
    }
}
