//! Typed, namespaced accessors for the three record kinds.
//!
//! Keys have the form `{namespace}:{segment}:{id}`:
//!
//! | Kind | Segment | Id |
//! |---|---|---|
//! | hidden orders | `hidden_order` | order ID |
//! | action log | `action_log` | UUIDv7 (time-ordered) |
//! | user settings | `user_settings` | username |
//!
//! Hidden orders and settings are keyed by their join key, so storing a
//! duplicate overwrites the earlier record.

use crate::error::StorageResult;
use crate::store::CacheStore;
use ordersheet_types::{ActionLogRecord, HiddenOrderRecord, RecordKind, UserSettingsRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "ordersheet";

/// Record counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheCounts {
    pub hidden_orders: usize,
    pub action_log: usize,
    pub user_settings: usize,
}

impl CacheCounts {
    #[must_use]
    pub fn get(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders,
            RecordKind::ActionLog => self.action_log,
            RecordKind::UserSettings => self.user_settings,
        }
    }

    pub fn set(&mut self, kind: RecordKind, count: usize) {
        match kind {
            RecordKind::HiddenOrders => self.hidden_orders = count,
            RecordKind::ActionLog => self.action_log = count,
            RecordKind::UserSettings => self.user_settings = count,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.hidden_orders + self.action_log + self.user_settings
    }
}

fn segment(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::HiddenOrders => "hidden_order",
        RecordKind::ActionLog => "action_log",
        RecordKind::UserSettings => "user_settings",
    }
}

/// A record that can live in a [`RecordCache`].
pub trait CachedRecord: Serialize + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;

    /// Id part of the cache key.
    fn cache_id(&self) -> String;
}

impl CachedRecord for HiddenOrderRecord {
    const KIND: RecordKind = RecordKind::HiddenOrders;

    fn cache_id(&self) -> String {
        self.order_id.clone()
    }
}

impl CachedRecord for ActionLogRecord {
    const KIND: RecordKind = RecordKind::ActionLog;

    // Log entries have no natural key.
    fn cache_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

impl CachedRecord for UserSettingsRecord {
    const KIND: RecordKind = RecordKind::UserSettings;

    fn cache_id(&self) -> String {
        self.username.clone()
    }
}

/// Typed view over a [`CacheStore`], scoped to one namespace.
#[derive(Clone)]
pub struct RecordCache {
    backend: Arc<dyn CacheStore>,
    namespace: String,
}

impl RecordCache {
    /// Creates a typed cache over `store` under [`DEFAULT_NAMESPACE`].
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: Arc<dyn CacheStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend: store,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The underlying untyped store.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn CacheStore> {
        &self.backend
    }

    fn namespace_prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    fn kind_prefix(&self, kind: RecordKind) -> String {
        format!("{}:{}:", self.namespace, segment(kind))
    }

    /// Cache key for one record.
    #[must_use]
    pub fn key(&self, kind: RecordKind, id: &str) -> String {
        format!("{}{id}", self.kind_prefix(kind))
    }

    /// Stores any cached record kind. Returns the key.
    pub async fn store<T: CachedRecord>(&self, record: &T) -> StorageResult<String> {
        let key = self.key(T::KIND, &record.cache_id());
        self.backend.set(&key, serde_json::to_value(record)?).await?;
        Ok(key)
    }

    /// Stores a hidden order under its order ID. Returns the key.
    pub async fn store_hidden_order(&self, record: &HiddenOrderRecord) -> StorageResult<String> {
        self.store(record).await
    }

    /// Stores an action-log entry under a fresh time-ordered key.
    pub async fn store_action_log(&self, record: &ActionLogRecord) -> StorageResult<String> {
        self.store(record).await
    }

    /// Stores user settings under the username. Returns the key.
    pub async fn store_user_settings(&self, record: &UserSettingsRecord) -> StorageResult<String> {
        self.store(record).await
    }

    pub async fn get_hidden_order(&self, order_id: &str) -> StorageResult<Option<HiddenOrderRecord>> {
        self.get_one(self.key(RecordKind::HiddenOrders, order_id)).await
    }

    pub async fn get_user_settings(&self, username: &str) -> StorageResult<Option<UserSettingsRecord>> {
        self.get_one(self.key(RecordKind::UserSettings, username)).await
    }

    async fn get_one<T: CachedRecord>(&self, key: String) -> StorageResult<Option<T>> {
        match self.backend.get(&key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// All cached hidden orders, ordered by order ID.
    pub async fn get_all_hidden_orders(&self) -> StorageResult<Vec<HiddenOrderRecord>> {
        self.get_all().await
    }

    /// All cached action-log entries, oldest insert first.
    pub async fn get_all_action_log(&self) -> StorageResult<Vec<ActionLogRecord>> {
        self.get_all().await
    }

    /// All cached user settings, ordered by username.
    pub async fn get_all_user_settings(&self) -> StorageResult<Vec<UserSettingsRecord>> {
        self.get_all().await
    }

    /// All cached records of one kind, in key order.
    pub async fn get_all<T: CachedRecord>(&self) -> StorageResult<Vec<T>> {
        let kind = T::KIND;
        let prefix = self.kind_prefix(kind);
        let mut keys: Vec<String> = self
            .backend
            .list_all_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .collect();
        keys.sort();

        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            match self.backend.get(&key).await? {
                Some(value) => records.push(serde_json::from_value(value)?),
                // Removed between list and get.
                None => warn!("Cache key {} vanished while reading {}", key, kind.label()),
            }
        }
        Ok(records)
    }

    /// Every key under this namespace, including ones this crate did not write.
    pub async fn namespaced_keys(&self) -> StorageResult<Vec<String>> {
        let prefix = self.namespace_prefix();
        Ok(self
            .backend
            .list_all_keys()
            .await?
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .collect())
    }

    /// Removes every key under this namespace in one batch. Returns the
    /// number of keys removed.
    pub async fn clear(&self) -> StorageResult<usize> {
        let keys = self.namespaced_keys().await?;
        if !keys.is_empty() {
            self.backend.remove_many(&keys).await?;
        }
        debug!(
            "Cleared {} key(s) under namespace {} ({})",
            keys.len(),
            self.namespace,
            self.backend.backend_name()
        );
        Ok(keys.len())
    }

    /// Record counts per kind, from the key listing.
    pub async fn counts(&self) -> StorageResult<CacheCounts> {
        let keys = self.namespaced_keys().await?;
        let mut counts = CacheCounts::default();
        for kind in RecordKind::ALL {
            let prefix = self.kind_prefix(kind);
            counts.set(kind, keys.iter().filter(|key| key.starts_with(&prefix)).count());
        }
        Ok(counts)
    }
}
