use ordersheet_storage::{CacheCounts, CacheStore, MemoryCache, RecordCache, SqliteCache};
use ordersheet_types::{
    ActionLogRecord, ActionType, HiddenOrderRecord, HiddenType, IsoTimestamp, RecordKind,
    UserSettingsRecord,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn ts(raw: &str) -> IsoTimestamp {
    IsoTimestamp::parse(raw).unwrap()
}

fn order(id: &str) -> HiddenOrderRecord {
    HiddenOrderRecord {
        order_id: id.into(),
        order_date: Some(ts("2024-01-15")),
        hidden_by: "john_doe".into(),
        tags: vec!["electronics".into()],
        hidden_type: HiddenType::Details,
        hidden_at: ts("2024-01-15T10:30:00Z"),
        last_modified: ts("2024-01-15T10:30:00Z"),
    }
}

fn action(id: &str, action: ActionType) -> ActionLogRecord {
    ActionLogRecord {
        action,
        order_id: id.into(),
        performed_by: "john_doe".into(),
        timestamp: ts("2024-01-15T10:30:00Z"),
        tags: Vec::new(),
        browser_info: "Firefox".into(),
    }
}

fn settings(username: &str) -> UserSettingsRecord {
    UserSettingsRecord {
        username: username.into(),
        last_modified: ts("2024-02-01T00:00:00Z"),
    }
}

fn memory_cache() -> (Arc<MemoryCache>, RecordCache) {
    let store = Arc::new(MemoryCache::new());
    let cache = RecordCache::new(store.clone());
    (store, cache)
}

// ── Keys ─────────────────────────────────────────────────────────

#[tokio::test]
async fn keys_are_namespaced_per_kind() {
    let (_, cache) = memory_cache();
    assert_eq!(cache.namespace(), "ordersheet");
    assert_eq!(cache.key(RecordKind::HiddenOrders, "A1"), "ordersheet:hidden_order:A1");
    assert_eq!(cache.key(RecordKind::UserSettings, "john"), "ordersheet:user_settings:john");

    let key = cache.store_hidden_order(&order("A1")).await.unwrap();
    assert_eq!(key, "ordersheet:hidden_order:A1");

    let key = cache.store_action_log(&action("A1", ActionType::Hide)).await.unwrap();
    assert!(key.starts_with("ordersheet:action_log:"));
}

#[tokio::test]
async fn duplicate_join_keys_overwrite() {
    let (_, cache) = memory_cache();
    cache.store_hidden_order(&order("A1")).await.unwrap();
    let mut newer = order("A1");
    newer.hidden_by = "jane".into();
    cache.store_hidden_order(&newer).await.unwrap();

    assert_eq!(cache.get_all_hidden_orders().await.unwrap(), vec![newer]);
}

// ── Typed reads ──────────────────────────────────────────────────

#[tokio::test]
async fn get_all_returns_records_of_one_kind() {
    let (_, cache) = memory_cache();
    cache.store_hidden_order(&order("B2")).await.unwrap();
    cache.store_hidden_order(&order("A1")).await.unwrap();
    cache.store_action_log(&action("A1", ActionType::Hide)).await.unwrap();
    cache.store_action_log(&action("A1", ActionType::Unhide)).await.unwrap();
    cache.store_user_settings(&settings("john")).await.unwrap();

    let orders = cache.get_all_hidden_orders().await.unwrap();
    assert_eq!(orders, vec![order("A1"), order("B2")]);

    let log = cache.get_all_action_log().await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].action, ActionType::Hide);
    assert_eq!(log[1].action, ActionType::Unhide);

    assert_eq!(cache.get_all_user_settings().await.unwrap(), vec![settings("john")]);
    assert_eq!(cache.get_user_settings("john").await.unwrap(), Some(settings("john")));
    assert_eq!(cache.get_hidden_order("nope").await.unwrap(), None);
}

#[tokio::test]
async fn legacy_field_names_still_read() {
    let (store, cache) = memory_cache();
    store
        .set(
            "ordersheet:hidden_order:A9",
            json!({
                "orderId": "A9",
                "orderDate": null,
                "username": "john",
                "tags": [],
                "hiddenType": "details",
                "timestamp": "2024-01-15T10:30:00.000Z",
                "lastModified": "2024-01-15T10:30:00.000Z"
            }),
        )
        .await
        .unwrap();

    let record = cache.get_hidden_order("A9").await.unwrap().unwrap();
    assert_eq!(record.hidden_by, "john");
    assert_eq!(record.hidden_at, ts("2024-01-15T10:30:00Z"));
}

// ── Counts and clearing ──────────────────────────────────────────

#[tokio::test]
async fn counts_and_clear_respect_namespace() {
    let (store, cache) = memory_cache();
    cache.store_hidden_order(&order("A1")).await.unwrap();
    cache.store_action_log(&action("A1", ActionType::Hide)).await.unwrap();
    cache.store_user_settings(&settings("john")).await.unwrap();
    cache.store_user_settings(&settings("jane")).await.unwrap();
    store.set("ordersheet:misc", json!(true)).await.unwrap();
    store.set("other:hidden_order:A1", json!({})).await.unwrap();
    store.set("ordersheet2:x", json!({})).await.unwrap();

    assert_eq!(
        cache.counts().await.unwrap(),
        CacheCounts {
            hidden_orders: 1,
            action_log: 1,
            user_settings: 2,
        }
    );
    assert_eq!(cache.namespaced_keys().await.unwrap().len(), 5);

    assert_eq!(cache.clear().await.unwrap(), 5);
    assert_eq!(cache.counts().await.unwrap().total(), 0);
    assert_eq!(
        store.list_all_keys().await.unwrap(),
        vec!["ordersheet2:x", "other:hidden_order:A1"]
    );
}

#[tokio::test]
async fn custom_namespace_is_isolated() {
    let store = Arc::new(MemoryCache::new());
    let a = RecordCache::with_namespace(store.clone(), "a");
    let b = RecordCache::with_namespace(store.clone(), "b");

    a.store_user_settings(&settings("john")).await.unwrap();
    assert_eq!(a.counts().await.unwrap().user_settings, 1);
    assert_eq!(b.counts().await.unwrap().user_settings, 0);

    b.clear().await.unwrap();
    assert_eq!(a.counts().await.unwrap().user_settings, 1);
}

#[tokio::test]
async fn sqlite_backend_round_trips_records() {
    let store = Arc::new(SqliteCache::open_in_memory().unwrap());
    let cache = RecordCache::new(store);

    cache.store_hidden_order(&order("A1")).await.unwrap();
    cache.store_action_log(&action("A1", ActionType::Unhide)).await.unwrap();

    assert_eq!(cache.get_all_hidden_orders().await.unwrap(), vec![order("A1")]);
    assert_eq!(cache.get_all_action_log().await.unwrap(), vec![action("A1", ActionType::Unhide)]);
    assert_eq!(cache.counts().await.unwrap().get(RecordKind::ActionLog), 1);
}
