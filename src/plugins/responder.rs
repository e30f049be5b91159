//! Responder plugin - canned, filtered replies to trigger phrases

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::application::Bot;
use crate::domain::entities::Message;
use crate::plugins::trait_def::Plugin;

/// Reply with `template` when a message contains `trigger`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResponderRule {
    pub trigger: String,
    pub template: String,
    #[serde(default)]
    pub action: bool,
}

impl ResponderRule {
    pub fn new(trigger: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            template: template.into(),
            action: false,
        }
    }

    pub fn as_action(mut self) -> Self {
        self.action = true;
        self
    }

    fn matches(&self, body: &str) -> bool {
        body.to_lowercase().contains(&self.trigger.to_lowercase())
    }
}

/// Matches triggers case-insensitively, first rule wins
pub struct ResponderPlugin {
    rules: Vec<ResponderRule>,
}

impl ResponderPlugin {
    pub const NAME: &'static str = "responder";

    pub fn new(rules: Vec<ResponderRule>) -> Self {
        Self { rules }
    }
}

#[async_trait]
impl Plugin for ResponderPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_message(&self, bot: &Bot, msg: &Message) -> bool {
        let Some(rule) = self.rules.iter().find(|r| r.matches(&msg.body)) else {
            return false;
        };

        let reply = bot.filter(msg, &rule.template).await;
        let sent = if rule.action {
            bot.send_action(&msg.channel, &reply).await
        } else {
            bot.send_message(&msg.channel, &reply).await
        };

        if let Err(e) = sent {
            warn!("[{}] Responder failed to reply: {}", msg.channel, e);
        }
        true
    }

    async fn render_help(&self, bot: &Bot, channel: &str, _tokens: &[String]) {
        let triggers: Vec<&str> = self.rules.iter().map(|r| r.trigger.as_str()).collect();
        let text = if triggers.is_empty() {
            "I don't respond to anything yet.".to_string()
        } else {
            format!("I respond to: {}", triggers.join(", "))
        };
        if let Err(e) = bot.send_message(channel, &text).await {
            warn!("Failed to send responder help: {}", e);
        }
    }
}
