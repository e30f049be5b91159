//! Message parser - Turns raw chat lines into structured messages

use crate::domain::entities::{Message, User};

const ACTION_PREFIX: &str = "/me ";

/// Parses incoming lines into Message objects
///
/// A line is a command when it starts with the command prefix or addresses
/// the bot by nick (`whisker: ...` / `whisker, ...`). The address is removed
/// from `body`; `raw` keeps the line as received.
pub struct MessageParser {
    command_prefix: String,
    nick: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
            nick: nick.into(),
        }
    }

    /// Parse a chat line from `user` in `channel`
    pub fn parse(&self, user: User, channel: impl Into<String>, text: impl Into<String>) -> Message {
        let raw = text.into();
        let mut body = raw.trim();

        let action = match body.strip_prefix(ACTION_PREFIX) {
            Some(rest) => {
                body = rest.trim_start();
                true
            }
            None => false,
        };

        let (body, command) = match self.strip_address(body) {
            Some(rest) => (rest, true),
            None => (body, false),
        };

        let mut msg = Message::new(user, channel, body).with_action(action);
        msg.command = command;
        msg.with_raw(raw)
    }

    fn strip_address<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !self.command_prefix.is_empty() {
            if let Some(rest) = text.strip_prefix(self.command_prefix.as_str()) {
                return Some(rest.trim_start());
            }
        }

        if self.nick.is_empty() || text.len() <= self.nick.len() {
            return None;
        }
        let head = text.get(..self.nick.len())?;
        if !head.eq_ignore_ascii_case(&self.nick) {
            return None;
        }
        let tail = &text[self.nick.len()..];
        tail.strip_prefix(':')
            .or_else(|| tail.strip_prefix(','))
            .map(str::trim_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MessageParser {
        MessageParser::new("!", "whisker")
    }

    fn parse(text: &str) -> Message {
        parser().parse(User::new("bob"), "#cats", text)
    }

    #[test]
    fn test_plain_text() {
        let msg = parse("just chatting");
        assert!(!msg.command);
        assert!(!msg.action);
        assert_eq!(msg.body, "just chatting");
    }

    #[test]
    fn test_prefix_marks_command() {
        let msg = parse("!help about");
        assert!(msg.command);
        assert_eq!(msg.body, "help about");
        assert_eq!(msg.raw, "!help about");
    }

    #[test]
    fn test_nick_address_marks_command() {
        let msg = parse("Whisker: help");
        assert!(msg.command);
        assert_eq!(msg.body, "help");

        let msg = parse("whisker, what's up");
        assert!(msg.command);
        assert_eq!(msg.body, "what's up");
    }

    #[test]
    fn test_nick_without_separator_is_not_a_command() {
        let msg = parse("whiskers are great");
        assert!(!msg.command);
        assert_eq!(msg.body, "whiskers are great");
    }

    #[test]
    fn test_action() {
        let msg = parse("/me stretches");
        assert!(msg.action);
        assert!(!msg.command);
        assert_eq!(msg.body, "stretches");
        assert_eq!(msg.raw, "/me stretches");
    }
}
