//! Variable filter - expands `$tokens` in reply templates

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::Rng;
use regex_lite::Regex;
use tracing::{debug, error, warn};

use crate::domain::entities::Message;
use crate::domain::traits::{Roster, VariableStore};

/// Default cap on store-backed substitutions per call
pub const DEFAULT_MAX_EXPANSIONS: usize = 256;

/// Tokens the filter always understands, in help listing order
pub const BUILTIN_TOKENS: [&str; 5] = ["$who", "$someone", "$digit", "$nonzero", "$nick"];

/// Never resolved against the store
const RESERVED_TOKENS: [&str; 1] = ["$and"];

static VARIABLE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$[A-Za-z]+").unwrap());

/// Expands reply templates for a triggering message
pub struct VariableFilter {
    variables: Arc<dyn VariableStore>,
    roster: Arc<dyn Roster>,
    max_expansions: usize,
}

impl VariableFilter {
    pub fn new(variables: Arc<dyn VariableStore>, roster: Arc<dyn Roster>) -> Self {
        Self {
            variables,
            roster,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }

    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = max;
        self
    }

    /// Expand every token in `input` using `message` for context
    pub async fn filter(&self, message: &Message, input: &str) -> String {
        let nick = message.user.display_name();

        let mut output = input.replace("$NICK", &nick.to_uppercase());
        output = output.replace("$who", "$nick");
        output = output.replace("$nick", nick);

        if output.contains("$someone") {
            output = self.fill_someone(output, &message.channel).await;
        }

        output = fill_digits(output, "$digit", 0..9);
        output = fill_digits(output, "$nonzero", 1..9);

        self.fill_variables(output).await
    }

    async fn fill_someone(&self, output: String, channel: &str) -> String {
        let members = self.roster.members(channel).await;
        if members.is_empty() {
            warn!("No one in {} to stand in for $someone", channel);
            return output.replace("$someone", "");
        }

        let mut rng = rand::rng();
        replace_each(&output, "$someone", || {
            members
                .choose(&mut rng)
                .map(|u| u.display_name().to_string())
                .unwrap_or_default()
        })
    }

    /// Resolve store-backed tokens until nothing resolvable remains.
    ///
    /// Unknown tokens go on a per-call blacklist and stay literal, so every
    /// pass either substitutes or grows the blacklist.
    async fn fill_variables(&self, mut output: String) -> String {
        let mut blacklist: HashSet<String> =
            RESERVED_TOKENS.iter().map(|t| t.to_string()).collect();
        let mut expansions = 0;

        loop {
            let Some(found) = VARIABLE_TOKEN
                .find_iter(&output)
                .find(|m| !blacklist.contains(m.as_str()))
            else {
                break;
            };
            let token = found.as_str().to_string();
            let range = found.range();

            if expansions >= self.max_expansions {
                warn!(
                    "Stopped expanding after {} substitutions, leaving {}",
                    expansions, token
                );
                break;
            }

            match self.variables.resolve_random(&token[1..]).await {
                Ok(Some(value)) => {
                    debug!("Expanded {} -> {}", token, value);
                    output.replace_range(range, &value);
                    expansions += 1;
                }
                Ok(None) => {
                    blacklist.insert(token);
                }
                Err(e) => {
                    error!("Variable lookup for {} failed: {}", token, e);
                    blacklist.insert(token);
                }
            }
        }

        output
    }
}

/// Replace each occurrence of `token` with its own random digit from `range`
fn fill_digits(output: String, token: &str, range: std::ops::Range<u32>) -> String {
    let mut rng = rand::rng();
    replace_each(&output, token, || rng.random_range(range.clone()).to_string())
}

/// Single left-to-right pass; inserted text is never scanned again
fn replace_each(input: &str, token: &str, mut pick: impl FnMut() -> String) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(idx) = rest.find(token) {
        output.push_str(&rest[..idx]);
        output.push_str(&pick());
        rest = &rest[idx + token.len()..];
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::StorageError;
    use crate::domain::entities::User;
    use crate::infrastructure::storage::{ChannelRoster, MemoryVariableStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn message_from(name: &str) -> Message {
        Message::new(User::new(name), "#cats", "hi")
    }

    fn filter_with(store: MemoryVariableStore) -> VariableFilter {
        VariableFilter::new(Arc::new(store), Arc::new(ChannelRoster::new()))
    }

    /// Records every name the filter asks for
    #[derive(Default)]
    struct SpyStore {
        asked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VariableStore for SpyStore {
        async fn resolve_random(&self, name: &str) -> Result<Option<String>, StorageError> {
            self.asked.lock().unwrap().push(name.to_string());
            if name == "and" {
                return Ok(Some("BROKEN".to_string()));
            }
            Ok(None)
        }

        async fn list_names(&self) -> Result<Vec<String>, StorageError> {
            Ok(vec!["and".to_string()])
        }
    }

    struct FailingStore;

    #[async_trait]
    impl VariableStore for FailingStore {
        async fn resolve_random(&self, _name: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("database is locked".to_string()))
        }

        async fn list_names(&self) -> Result<Vec<String>, StorageError> {
            Err(StorageError::Unavailable("database is locked".to_string()))
        }
    }

    #[tokio::test]
    async fn test_upper_nick() {
        let filter = filter_with(MemoryVariableStore::new());
        assert_eq!(filter.filter(&message_from("bob"), "hello $NICK").await, "hello BOB");
    }

    #[tokio::test]
    async fn test_who_is_an_alias_for_nick() {
        let filter = filter_with(MemoryVariableStore::new());
        assert_eq!(
            filter.filter(&message_from("Alice"), "$who says hi").await,
            "Alice says hi"
        );
        assert_eq!(
            filter.filter(&message_from("Alice"), "$nick and $nick").await,
            "Alice and Alice"
        );
    }

    #[tokio::test]
    async fn test_digit_ranges() {
        let filter = filter_with(MemoryVariableStore::new());
        let msg = message_from("bob");
        for _ in 0..1000 {
            let digit = filter.filter(&msg, "$digit").await;
            assert_eq!(digit.len(), 1);
            assert!(('0'..='8').contains(&digit.chars().next().unwrap()), "got {}", digit);

            let nonzero = filter.filter(&msg, "$nonzero").await;
            assert_eq!(nonzero.len(), 1);
            assert!(('1'..='8').contains(&nonzero.chars().next().unwrap()), "got {}", nonzero);
        }
    }

    #[tokio::test]
    async fn test_each_digit_occurrence_is_replaced() {
        let filter = filter_with(MemoryVariableStore::new());
        let out = filter.filter(&message_from("bob"), "$digit$digit$nonzero").await;
        assert_eq!(out.len(), 3);
        assert!(out.chars().all(|c| c.is_ascii_digit() && c != '9'));
    }

    #[tokio::test]
    async fn test_unknown_token_is_left_alone() {
        let filter = filter_with(MemoryVariableStore::new());
        assert_eq!(
            filter.filter(&message_from("bob"), "what is $zzzznotreal?").await,
            "what is $zzzznotreal?"
        );
    }

    #[tokio::test]
    async fn test_and_never_reaches_the_store() {
        let spy = Arc::new(SpyStore::default());
        let filter = VariableFilter::new(spy.clone(), Arc::new(ChannelRoster::new()));

        let out = filter.filter(&message_from("bob"), "cats $and $dogs").await;

        assert_eq!(out, "cats $and $dogs");
        let asked = spy.asked.lock().unwrap().clone();
        assert_eq!(asked, vec!["dogs".to_string()]);
    }

    #[tokio::test]
    async fn test_store_values_expand_recursively() {
        let store = MemoryVariableStore::new();
        store.add_value("greeting", "hello $target").await;
        store.add_value("target", "$nick-ish world").await;
        let filter = filter_with(store);

        // $nick inside stored values is not a builtin pass anymore, it is
        // looked up in the store and stays literal.
        assert_eq!(
            filter.filter(&message_from("bob"), "$greeting!").await,
            "hello $nick-ish world!"
        );
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_hide_later_ones() {
        let store = MemoryVariableStore::new();
        store.add_value("color", "blue").await;
        let filter = filter_with(store);

        assert_eq!(
            filter.filter(&message_from("bob"), "$nothing is $color").await,
            "$nothing is blue"
        );
    }

    #[tokio::test]
    async fn test_self_reference_stops_at_cap() {
        let store = MemoryVariableStore::new();
        store.add_value("loop", "x$loop").await;
        let filter = filter_with(store).with_max_expansions(10);

        let out = filter.filter(&message_from("bob"), "$loop").await;
        assert_eq!(out, format!("{}$loop", "x".repeat(10)));
    }

    #[tokio::test]
    async fn test_store_failure_leaves_token_literal() {
        let filter = VariableFilter::new(Arc::new(FailingStore), Arc::new(ChannelRoster::new()));
        assert_eq!(
            filter.filter(&message_from("bob"), "pet the $animal").await,
            "pet the $animal"
        );
    }

    #[tokio::test]
    async fn test_someone_picks_channel_members() {
        let roster = ChannelRoster::new();
        roster.join("#cats", User::new("tom")).await;
        roster.join("#cats", User::new("felix")).await;
        let filter = VariableFilter::new(Arc::new(MemoryVariableStore::new()), Arc::new(roster));

        for _ in 0..50 {
            let out = filter.filter(&message_from("bob"), "$someone/$someone").await;
            let (a, b) = out.split_once('/').unwrap();
            assert!(a == "tom" || a == "felix", "got {}", out);
            assert!(b == "tom" || b == "felix", "got {}", out);
        }
    }

    #[tokio::test]
    async fn test_someone_with_empty_roster_is_removed() {
        let filter = filter_with(MemoryVariableStore::new());
        assert_eq!(
            filter.filter(&message_from("bob"), "hug $someone now").await,
            "hug  now"
        );
    }

    #[tokio::test]
    async fn test_member_named_like_the_token_is_inserted_once() {
        let roster = ChannelRoster::new();
        roster.join("#cats", User::new("$someone")).await;
        let filter = VariableFilter::new(Arc::new(MemoryVariableStore::new()), Arc::new(roster));

        let out = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            filter.filter(&message_from("bob"), "hi $someone and $someone"),
        )
        .await
        .expect("filter finished");

        assert_eq!(out, "hi $someone and $someone");
    }

    #[tokio::test]
    async fn test_nick_that_looks_like_a_digit_token_is_expanded_once() {
        let filter = filter_with(MemoryVariableStore::new());
        let out = filter.filter(&message_from("$digit"), "$nick!").await;
        assert_eq!(out.len(), 2);
        assert!(out.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn test_replace_each_skips_inserted_text() {
        let out = replace_each("a $x b $x", "$x", || "$x$x".to_string());
        assert_eq!(out, "a $x$x b $x$x");
    }
}
