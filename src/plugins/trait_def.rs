//! Plugin trait definitions

use async_trait::async_trait;

use crate::application::Bot;
use crate::domain::entities::Message;

/// Core plugin trait that all plugins must implement
///
/// Every handler returns whether the plugin claimed the input. A claim stops
/// the dispatcher from offering the input to plugins registered later.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Unique identifier, also used as the help topic
    fn name(&self) -> &str;

    /// Inbound chat message
    async fn on_message(&self, bot: &Bot, msg: &Message) -> bool;

    /// Inbound raw event; `event` is the message body verbatim
    async fn on_event(&self, _bot: &Bot, _event: &str, _msg: &Message) -> bool {
        false
    }

    /// Something the bot itself just said
    async fn on_bot_message(&self, _bot: &Bot, _msg: &Message) -> bool {
        false
    }

    /// Answer `help <name>` in `channel`
    async fn render_help(&self, bot: &Bot, channel: &str, _tokens: &[String]) {
        let text = format!("{} doesn't have any help yet.", self.name());
        if let Err(e) = bot.send_message(channel, &text).await {
            tracing::warn!("Failed to send help for {}: {}", self.name(), e);
        }
    }
}
