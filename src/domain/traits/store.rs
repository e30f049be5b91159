use async_trait::async_trait;
use crate::application::errors::StorageError;

/// VariableStore trait - named variables holding a multiset of values
///
/// Names are stored without the leading `$`.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// Pick one value for `name` uniformly at random, `None` if unknown
    async fn resolve_random(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Every variable name the store knows about, in no particular order
    async fn list_names(&self) -> Result<Vec<String>, StorageError>;
}
