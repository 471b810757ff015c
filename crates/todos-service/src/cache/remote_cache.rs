//! Remote cache capability consumed by the todo store.

use async_trait::async_trait;
use std::time::Duration;
use todos_core::TodosResult;

/// Key/value store with expiring keys and pub/sub publishing.
///
/// Implementations bound every call with their own timeout; a timed-out or
/// failed call returns an error and never panics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCache: Send + Sync {
    /// Current connectivity as last observed by the client.
    fn is_connected(&self) -> bool;

    /// Get a raw value. Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> TodosResult<Option<String>>;

    /// Set a raw value that expires after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> TodosResult<()>;

    /// Publish a message to a channel.
    async fn publish(&self, channel: &str, payload: &str) -> TodosResult<()>;
}
