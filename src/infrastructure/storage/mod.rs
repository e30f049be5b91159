//! In-memory variable store

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::StorageError;
use crate::domain::traits::VariableStore;

pub mod roster;

pub use roster::ChannelRoster;

/// Variable store kept entirely in memory
///
/// Used when no database is configured, and by tests.
#[derive(Clone, Default)]
pub struct MemoryVariableStore {
    values: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MemoryVariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one more candidate value for `name`
    pub async fn add_value(&self, name: &str, value: &str) {
        let mut values = self.values.write().await;
        values
            .entry(name.to_string())
            .or_insert_with(Vec::new)
            .push(value.to_string());
    }
}

#[async_trait]
impl VariableStore for MemoryVariableStore {
    async fn resolve_random(&self, name: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().await;
        Ok(values
            .get(name)
            .and_then(|candidates| candidates.choose(&mut rand::rng()))
            .cloned())
    }

    async fn list_names(&self) -> Result<Vec<String>, StorageError> {
        let values = self.values.read().await;
        Ok(values.keys().cloned().collect())
    }
}
