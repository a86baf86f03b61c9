//! Cache store abstraction trait.

use crate::error::StorageResult;
use async_trait::async_trait;
use serde_json::Value;

/// Abstract key/value cache.
///
/// Every call is a suspension point and every call can fail; callers decide
/// per call site whether a failure degrades or aborts.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Gets the value stored under `key`.
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Removes every key in `keys` as one batch.
    async fn remove_many(&self, keys: &[String]) -> StorageResult<()>;

    /// Lists every key in the store, in ascending order.
    async fn list_all_keys(&self) -> StorageResult<Vec<String>>;
}
