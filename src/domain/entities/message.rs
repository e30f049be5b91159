use super::User;
use chrono::{DateTime, Utc};

/// One chat line or action as seen by the dispatcher.
///
/// `raw` is the untouched line the transport delivered; `body` is the
/// normalized text used for routing (command prefix or nick address removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub user: User,
    pub channel: String,
    pub body: String,
    pub raw: String,
    pub action: bool,
    pub command: bool,
    pub time: DateTime<Utc>,
    pub host: String,
}

impl Message {
    pub fn new(user: User, channel: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let host = user.host.clone();
        Self {
            user,
            channel: channel.into(),
            raw: body.clone(),
            body,
            action: false,
            command: false,
            time: Utc::now(),
            host,
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn as_command(mut self) -> Self {
        self.command = true;
        self
    }

    pub fn with_action(mut self, action: bool) -> Self {
        self.action = action;
        self
    }

    /// Lower-cased, whitespace separated words of the body
    pub fn tokens(&self) -> Vec<String> {
        self.body
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
