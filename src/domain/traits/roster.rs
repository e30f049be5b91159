use async_trait::async_trait;
use crate::domain::entities::User;

/// Roster trait - who is currently present in a channel
#[async_trait]
pub trait Roster: Send + Sync {
    async fn members(&self, channel: &str) -> Vec<User>;
}
