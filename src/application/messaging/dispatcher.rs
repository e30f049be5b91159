//! Message dispatcher - Routes inbound traffic through the plugin chain

use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::application::Bot;
use crate::domain::entities::Message;

/// Host recorded on messages the bot synthesizes for itself
pub const SELF_HOST: &str = "0.0.0.0";

/// What happened to one dispatched input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Answered by the built-in help router
    Help,
    /// Claimed by the named plugin
    Claimed(String),
    /// No plugin wanted it
    Unclaimed,
}

#[derive(Clone, Copy)]
enum Hook<'a> {
    Message,
    Event(&'a str),
    BotMessage,
}

impl fmt::Display for Hook<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Message => write!(f, "message"),
            Hook::Event(name) => write!(f, "event '{}'", name),
            Hook::BotMessage => write!(f, "bot message"),
        }
    }
}

impl Bot {
    /// Handle an inbound chat message
    ///
    /// The message always lands in the history. Commands starting with
    /// `help` go to the help router; everything else is offered to plugins in
    /// registration order until one claims it.
    pub async fn message_received(&self, msg: Message) -> Dispatch {
        debug!("[{}] <{}> {}", msg.channel, msg.user, msg.body);

        if let Err(e) = self.history.append(msg.clone()).await {
            warn!("Failed to record message in {}: {}", msg.channel, e);
        }

        if msg.command {
            let tokens = msg.tokens();
            if tokens.first().map(String::as_str) == Some("help") {
                if let Err(e) = self.check_help(&msg.channel, &tokens).await {
                    warn!("[{}] Help reply failed: {}", msg.channel, e);
                }
                return Dispatch::Help;
            }
        }

        self.dispatch(&msg, Hook::Message).await
    }

    /// Handle an inbound raw event; the event name is the message body
    pub async fn event_received(&self, msg: Message) -> Dispatch {
        debug!("[{}] event {}", msg.channel, msg.body);
        self.dispatch(&msg, Hook::Event(&msg.body)).await
    }

    /// Offer something the bot said to the plugins
    pub async fn bot_self_message(&self, channel: &str, text: &str, is_action: bool) -> Dispatch {
        let msg = Message::new(self.me.clone(), channel, text)
            .with_action(is_action)
            .with_host(SELF_HOST);
        self.dispatch(&msg, Hook::BotMessage).await
    }

    async fn dispatch(&self, msg: &Message, hook: Hook<'_>) -> Dispatch {
        for plugin in self.plugins.iter() {
            let call = match hook {
                Hook::Message => plugin.on_message(self, msg),
                Hook::Event(event) => plugin.on_event(self, event, msg),
                Hook::BotMessage => plugin.on_bot_message(self, msg),
            };

            match AssertUnwindSafe(call).catch_unwind().await {
                Ok(true) => {
                    debug!("[{}] {} claimed {}", msg.channel, plugin.name(), hook);
                    return Dispatch::Claimed(plugin.name().to_string());
                }
                Ok(false) => {}
                Err(_) => {
                    error!(
                        "[{}] Plugin {} panicked handling {}, moving on",
                        msg.channel,
                        plugin.name(),
                        hook
                    );
                }
            }
        }

        Dispatch::Unclaimed
    }
}
