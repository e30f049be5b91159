//! Help router - answers `help [topic]`

use tracing::error;

use crate::application::errors::BotError;
use crate::application::services::filter::BUILTIN_TOKENS;
use crate::application::Bot;
use crate::plugins::registry::RESERVED_TOPICS;

impl Bot {
    /// Route a tokenized `help ...` request
    ///
    /// `tokens[0]` is `help`; the optional second token picks the topic.
    pub async fn check_help(&self, channel: &str, tokens: &[String]) -> Result<(), BotError> {
        let Some(topic) = tokens.get(1) else {
            return self.send_message(channel, &self.help_topics()).await;
        };

        match topic.as_str() {
            "about" => self.send_message(channel, &self.about()).await,
            "variables" => {
                let listing = self.variable_listing().await;
                self.send_message(channel, &listing).await
            }
            name => match self.plugins.get(name) {
                Some(plugin) => {
                    plugin.render_help(self, channel, tokens).await;
                    Ok(())
                }
                None => {
                    let msg = format!("I'm sorry, I don't know what {} is!", name);
                    self.send_message(channel, &msg).await
                }
            },
        }
    }

    fn help_topics(&self) -> String {
        let topics: Vec<&str> = RESERVED_TOPICS
            .iter()
            .copied()
            .chain(self.plugins.names().iter().map(String::as_str))
            .collect();
        format!("Help topics: {}", topics.join(", "))
    }

    fn about(&self) -> String {
        format!(
            "Hi, I'm based on whisker-bot version {}. I'm written in Rust, and you \
             can find my source code on the internet here: {}",
            self.version, self.source_url
        )
    }

    async fn variable_listing(&self) -> String {
        let mut msg = format!("I know: {}", BUILTIN_TOKENS.join(", "));

        match self.variables.list_names().await {
            Ok(names) => {
                for name in names {
                    msg.push_str(&format!(", ${}", name));
                }
            }
            Err(e) => {
                error!("Failed to list variables: {}", e);
                msg.push_str(" (stored variables are unavailable right now)");
            }
        }

        msg
    }
}

#[cfg(test)]
mod tests {
    use crate::application::errors::StorageError;
    use crate::application::services::MessageHistory;
    use crate::application::Bot;
    use crate::domain::entities::{Message, User};
    use crate::domain::traits::VariableStore;
    use crate::infrastructure::adapters::console::ConsoleAdapter;
    use crate::infrastructure::storage::{ChannelRoster, MemoryVariableStore};
    use crate::plugins::{Plugin, PluginRegistry};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Quiet(&'static str);

    #[async_trait]
    impl Plugin for Quiet {
        fn name(&self) -> &str {
            self.0
        }

        async fn on_message(&self, _bot: &Bot, _msg: &Message) -> bool {
            false
        }
    }

    struct Helpful;

    #[async_trait]
    impl Plugin for Helpful {
        fn name(&self) -> &str {
            "helpful"
        }

        async fn on_message(&self, _bot: &Bot, _msg: &Message) -> bool {
            false
        }

        async fn render_help(&self, bot: &Bot, channel: &str, tokens: &[String]) {
            let _ = bot
                .send_message(channel, &format!("helpful help: {}", tokens.join(" ")))
                .await;
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl VariableStore for BrokenStore {
        async fn resolve_random(&self, _name: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("gone".to_string()))
        }

        async fn list_names(&self) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Unavailable("gone".to_string()))
        }
    }

    fn build(variables: Arc<dyn VariableStore>) -> (Bot, ConsoleAdapter) {
        let mut registry = PluginRegistry::new();
        registry.register(Quiet("karma")).unwrap();
        registry.register(Helpful).unwrap();
        registry.register(Quiet("remember")).unwrap();

        let console = ConsoleAdapter::new().quiet();
        let bot = Bot::new(
            User::new("whisker"),
            Arc::new(console.clone()),
            variables,
            Arc::new(ChannelRoster::new()),
            MessageHistory::spawn(10),
        )
        .with_plugins(registry)
        .with_version("9.9.9")
        .with_source_url("https://example.org/whisker");
        (bot, console)
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    async fn reply_to(bot: &Bot, console: &ConsoleAdapter, words: &[&str]) -> String {
        bot.check_help("#cats", &tokens(words)).await.unwrap();
        console.sent().last().map(|o| o.text.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_topic_listing_in_registration_order() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let reply = reply_to(&bot, &console, &["help"]).await;
        assert_eq!(
            reply,
            "Help topics: about, variables, karma, helpful, remember"
        );
        assert_eq!(console.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_about() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let reply = reply_to(&bot, &console, &["help", "about"]).await;
        assert!(reply.contains("9.9.9"));
        assert!(reply.contains("https://example.org/whisker"));
    }

    #[tokio::test]
    async fn test_variables_lists_builtins_then_store() {
        let store = MemoryVariableStore::new();
        store.add_value("color", "blue").await;
        let (bot, console) = build(Arc::new(store));

        let reply = reply_to(&bot, &console, &["help", "variables"]).await;
        assert_eq!(
            reply,
            "I know: $who, $someone, $digit, $nonzero, $nick, $color"
        );
    }

    #[tokio::test]
    async fn test_variables_degrades_when_store_fails() {
        let (bot, console) = build(Arc::new(BrokenStore));
        let reply = reply_to(&bot, &console, &["help", "variables"]).await;
        assert!(reply.starts_with("I know: $who, $someone, $digit, $nonzero, $nick"));
        assert!(reply.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_plugin_topic_delegates() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let reply = reply_to(&bot, &console, &["help", "helpful", "more"]).await;
        assert_eq!(reply, "helpful help: help helpful more");
    }

    #[tokio::test]
    async fn test_plugin_default_help() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let reply = reply_to(&bot, &console, &["help", "karma"]).await;
        assert_eq!(reply, "karma doesn't have any help yet.");
    }

    #[tokio::test]
    async fn test_unknown_topic() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let reply = reply_to(&bot, &console, &["help", "nonexistentplugin"]).await;
        assert_eq!(reply, "I'm sorry, I don't know what nonexistentplugin is!");
    }

    #[tokio::test]
    async fn test_every_listed_topic_is_reachable_whatever_the_case() {
        let (bot, console) = build(Arc::new(MemoryVariableStore::new()));
        let names: Vec<String> = bot.plugins().names().to_vec();

        for name in names {
            let body = format!("HELP {}", name.to_uppercase());
            let msg = Message::new(User::new("bob"), "#cats", body).as_command();
            bot.message_received(msg).await;
            let reply = console.sent().last().map(|o| o.text.clone()).unwrap();
            assert!(!reply.starts_with("I'm sorry"), "{} not reachable: {}", name, reply);
        }
    }
}
