use async_trait::async_trait;
use crate::application::errors::BotError;

/// Transport trait - abstraction for the chat connection
#[async_trait]
pub trait Transport: Send + Sync {
    /// Connect and begin delivering inbound traffic
    async fn start(&self) -> Result<(), BotError>;

    /// Send a plain message to a channel
    async fn send_message(&self, channel: &str, text: &str) -> Result<(), BotError>;

    /// Send a "/me" style action to a channel
    async fn send_action(&self, channel: &str, text: &str) -> Result<(), BotError>;
}
