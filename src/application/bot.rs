//! Bot - the handle shared by adapters and plugins

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::services::{MessageHistory, VariableFilter};
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Roster, Transport, VariableStore};
use crate::plugins::PluginRegistry;

pub const DEFAULT_SOURCE_URL: &str = "https://github.com/whisker-bot/whisker-bot";

/// Central bot state
///
/// Built once at startup. Dispatch (`message_received`, `event_received`,
/// `bot_self_message`) lives in `messaging::dispatcher`, help routing in
/// `messaging::help`.
pub struct Bot {
    pub(crate) me: User,
    pub(crate) version: String,
    pub(crate) source_url: String,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) plugins: PluginRegistry,
    pub(crate) history: MessageHistory,
    pub(crate) filter: VariableFilter,
    pub(crate) variables: Arc<dyn VariableStore>,
}

impl Bot {
    pub fn new(
        me: User,
        transport: Arc<dyn Transport>,
        variables: Arc<dyn VariableStore>,
        roster: Arc<dyn Roster>,
        history: MessageHistory,
    ) -> Self {
        Self {
            me,
            version: env!("CARGO_PKG_VERSION").to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            transport,
            plugins: PluginRegistry::new(),
            history,
            filter: VariableFilter::new(variables.clone(), roster),
            variables,
        }
    }

    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.filter = self.filter.with_max_expansions(max);
        self
    }

    /// The bot's own identity
    pub fn me(&self) -> &User {
        &self.me
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn variables(&self) -> &Arc<dyn VariableStore> {
        &self.variables
    }

    /// Send a message and let plugins see it as a bot message
    pub async fn send_message(&self, channel: &str, text: &str) -> Result<(), BotError> {
        self.transport.send_message(channel, text).await?;
        self.bot_self_message(channel, text, false).await;
        Ok(())
    }

    /// Send an action and let plugins see it as a bot message
    pub async fn send_action(&self, channel: &str, text: &str) -> Result<(), BotError> {
        self.transport.send_action(channel, text).await?;
        self.bot_self_message(channel, text, true).await;
        Ok(())
    }

    /// Expand `$tokens` in `template` for a reply to `message`
    pub async fn filter(&self, message: &Message, template: &str) -> String {
        self.filter.filter(message, template).await
    }

    /// Most recent message seen in `channel`
    pub async fn last_message(&self, channel: &str) -> Result<Option<Message>, BotError> {
        Ok(self.history.last_message(channel).await?)
    }
}
