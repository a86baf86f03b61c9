use ordersheet_storage::{CacheStore, MemoryCache, SqliteCache, StorageError};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

// Runs the same contract checks against any backend.
async fn exercise_contract(store: &dyn CacheStore) {
    assert_eq!(store.get("missing").await.unwrap(), None);
    assert!(store.list_all_keys().await.unwrap().is_empty());

    store.set("b", json!({"n": 1})).await.unwrap();
    store.set("a", json!("text")).await.unwrap();
    store.set("c", json!([1, 2, 3])).await.unwrap();
    assert_eq!(store.get("b").await.unwrap(), Some(json!({"n": 1})));

    // Overwrite
    store.set("b", json!({"n": 2})).await.unwrap();
    assert_eq!(store.get("b").await.unwrap(), Some(json!({"n": 2})));

    assert_eq!(store.list_all_keys().await.unwrap(), vec!["a", "b", "c"]);

    store.remove("a").await.unwrap();
    store.remove("a").await.unwrap();
    assert_eq!(store.get("a").await.unwrap(), None);

    store
        .remove_many(&["b".to_string(), "c".to_string(), "zzz".to_string()])
        .await
        .unwrap();
    assert!(store.list_all_keys().await.unwrap().is_empty());
}

// ── Memory ───────────────────────────────────────────────────────

#[tokio::test]
async fn memory_cache_contract() {
    let cache = MemoryCache::new();
    exercise_contract(&cache).await;
    assert_eq!(cache.backend_name(), "memory");
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn memory_cache_len() {
    let cache = MemoryCache::new();
    cache.set("k1", json!(1)).await.unwrap();
    cache.set("k2", json!(2)).await.unwrap();
    assert_eq!(cache.len().await, 2);
}

// ── SQLite ───────────────────────────────────────────────────────

#[tokio::test]
async fn sqlite_in_memory_contract() {
    let cache = SqliteCache::open_in_memory().unwrap();
    exercise_contract(&cache).await;
    assert_eq!(cache.backend_name(), "sqlite");
}

#[tokio::test]
async fn sqlite_file_contract() {
    let dir = TempDir::new().unwrap();
    let cache = SqliteCache::open(dir.path().join("cache.db")).unwrap();
    exercise_contract(&cache).await;
}

#[tokio::test]
async fn sqlite_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.db");

    {
        let cache = SqliteCache::open(&path).unwrap();
        cache.set("ordersheet:user_settings:john", json!({"username": "john"})).await.unwrap();
    }

    let reopened = SqliteCache::open(&path).unwrap();
    assert_eq!(
        reopened.get("ordersheet:user_settings:john").await.unwrap(),
        Some(json!({"username": "john"}))
    );
}

#[tokio::test]
async fn sqlite_rejects_corrupt_value() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.db");
    let cache = SqliteCache::open(&path).unwrap();

    // Another writer left non-JSON text behind.
    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute("INSERT INTO kv (key, value) VALUES ('broken', 'not json')", [])
        .unwrap();

    let err = cache.get("broken").await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}

#[tokio::test]
async fn open_fails_for_directory_path() {
    let dir = TempDir::new().unwrap();
    let err = SqliteCache::open(dir.path()).err().unwrap();
    assert!(matches!(err, StorageError::Database(_)));
}
