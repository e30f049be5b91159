//! In-memory channel roster

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::User;
use crate::domain::traits::Roster;

/// Tracks who is present in each channel; channel names are case-insensitive.
#[derive(Clone, Default)]
pub struct ChannelRoster {
    channels: Arc<RwLock<HashMap<String, Vec<User>>>>,
}

impl ChannelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn join(&self, channel: &str, user: User) {
        let mut channels = self.channels.write().await;
        let members = channels.entry(channel.to_lowercase()).or_default();
        if !members.iter().any(|m| m.name == user.name) {
            members.push(user);
        }
    }

    /// Returns whether the user was present
    pub async fn part(&self, channel: &str, name: &str) -> bool {
        let mut channels = self.channels.write().await;
        let Some(members) = channels.get_mut(&channel.to_lowercase()) else {
            return false;
        };
        let before = members.len();
        members.retain(|m| m.name != name);
        before != members.len()
    }
}

#[async_trait]
impl Roster for ChannelRoster {
    async fn members(&self, channel: &str) -> Vec<User> {
        let channels = self.channels.read().await;
        channels
            .get(&channel.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
